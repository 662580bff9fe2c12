use clap::Parser;
use dw_anki::types::{
    ImportConfig, DEFAULT_ANKI_URL, DEFAULT_COURSE_URL, DEFAULT_DECK, DEFAULT_MODEL,
    DEFAULT_SITE_URL,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dw-anki")]
#[command(about = "Import DW Learn German vocabulary into Anki through AnkiConnect")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Course page listing the lessons
    #[arg(long, default_value = DEFAULT_COURSE_URL)]
    pub course_url: String,

    /// Base URL lesson and image links are resolved against
    #[arg(long, default_value = DEFAULT_SITE_URL)]
    pub site_url: String,

    /// Anki deck receiving the cards
    #[arg(long, default_value = DEFAULT_DECK)]
    pub deck: String,

    /// Anki note type with Front and Back fields
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// AnkiConnect endpoint
    #[arg(long, default_value = DEFAULT_ANKI_URL)]
    pub anki_url: String,

    /// Directory caching downloaded images
    #[arg(long, default_value = "images")]
    pub images_dir: PathBuf,

    /// Directory caching downloaded audio
    #[arg(long, default_value = "audio")]
    pub audio_dir: PathBuf,

    /// Log file written alongside console output
    #[arg(long, default_value = "run.log")]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn config(&self) -> ImportConfig {
        ImportConfig {
            site_url: self.site_url.clone(),
            course_url: self.course_url.clone(),
            deck: self.deck.clone(),
            model: self.model.clone(),
            anki_url: self.anki_url.clone(),
            images_dir: self.images_dir.clone(),
            audio_dir: self.audio_dir.clone(),
            log_file: self.log_file.clone(),
        }
    }
}
