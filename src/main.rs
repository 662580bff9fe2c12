mod cli;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use dw_anki::services::{AnkiConnect, HttpFetcher, Importer};
use dw_anki::types::ImportConfig;
use dw_anki::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::fmt::{self, format::Writer, time::FormatTime};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy)]
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    init_logging(&config, cli.verbose)?;

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Console and log file get the same records.
fn init_logging(config: &ImportConfig, verbose: bool) -> anyhow::Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_timer(LocalTime))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_timer(LocalTime)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    Ok(())
}

async fn run(config: ImportConfig) -> Result<()> {
    info!("Starting...");

    let anki = AnkiConnect::new(config.anki_url.clone());
    let importer = Importer::new(config, HttpFetcher::new(), anki)?;
    let summary = importer.run().await?;

    info!(
        "Imported {} lessons since {}: {} cards added, {} duplicates, {} failed",
        summary.lessons.len(),
        summary.started_at,
        summary.total_added(),
        summary.total_duplicates(),
        summary.total_failed()
    );
    Ok(())
}
