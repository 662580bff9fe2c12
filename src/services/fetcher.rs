use crate::error::{DwAnkiError, Result};
use crate::types::DownloadOutcome;
use reqwest::StatusCode;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Where pages and media bytes come from.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// GET `url` and return the body as text.
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// GET `url` and stream the body into `path`.
    ///
    /// Only a `200 OK` response creates the file; any other status leaves the
    /// filesystem untouched and is reported as [`DownloadOutcome::Skipped`].
    async fn download(&self, url: &str, path: &Path) -> Result<DownloadOutcome>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl PageSource for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        info!("Fetching page: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DwAnkiError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let content = response.text().await?;
        debug!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }

    async fn download(&self, url: &str, path: &Path) -> Result<DownloadOutcome> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            debug!("Not saving {} (status {})", url, status);
            return Ok(DownloadOutcome::Skipped {
                status: status.as_u16(),
            });
        }

        let mut file = fs::File::create(path).await?;
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        debug!("Saved {} bytes to {}", written, path.display());
        Ok(DownloadOutcome::Downloaded)
    }
}
