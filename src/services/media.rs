use crate::error::Result;
use crate::services::fetcher::PageSource;
use crate::types::{DownloadOutcome, MediaAsset};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// Local cache of downloaded images and audio, keyed by file name.
pub struct MediaCache {
    dir: PathBuf,
}

impl MediaCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        if !self.dir.is_dir() {
            fs::create_dir_all(&self.dir).await?;
            info!("Created media directory: {}", self.dir.display());
        }
        Ok(())
    }

    /// Downloads `url` into the cache unless a file with the same name is
    /// already there, then returns it base64 encoded.
    pub async fn fetch<S: PageSource>(&self, source: &S, url: &str) -> Result<MediaAsset> {
        let filename = media_filename(url);
        let path = self.dir.join(&filename);

        ensure_local(source, url, &path).await?;
        let data = to_base64(&path).await?;

        Ok(MediaAsset {
            filename,
            path,
            data,
        })
    }
}

/// Downloads `url` to `path` unless `path` already exists.
///
/// An existing file is trusted as is; it is never re-validated.
pub async fn ensure_local<S: PageSource>(
    source: &S,
    url: &str,
    path: &Path,
) -> Result<DownloadOutcome> {
    if path.is_file() {
        debug!("Using cached {}", path.display());
        return Ok(DownloadOutcome::Cached);
    }

    source.download(url, path).await
}

pub async fn to_base64(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await?;
    Ok(STANDARD.encode(&bytes))
}

/// Base file name of a media URL, i.e. its last path segment.
pub fn media_filename(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.last())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| url.rsplit('/').next().unwrap_or(url).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSource {
        body: &'static [u8],
        status: u16,
        downloads: Cell<usize>,
    }

    impl CountingSource {
        fn new(body: &'static [u8], status: u16) -> Self {
            Self {
                body,
                status,
                downloads: Cell::new(0),
            }
        }
    }

    impl PageSource for CountingSource {
        async fn fetch_page(&self, _url: &str) -> Result<String> {
            unreachable!("media tests never fetch pages")
        }

        async fn download(&self, _url: &str, path: &Path) -> Result<DownloadOutcome> {
            self.downloads.set(self.downloads.get() + 1);
            if self.status != 200 {
                return Ok(DownloadOutcome::Skipped {
                    status: self.status,
                });
            }
            fs::write(path, self.body).await?;
            Ok(DownloadOutcome::Downloaded)
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dw-anki-media-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_media_filename() {
        assert_eq!(
            media_filename("https://radiodownload.dw.com/Events/dwelle/hallo_01.mp3"),
            "hallo_01.mp3"
        );
        assert_eq!(
            media_filename("https://learngerman.dw.com/image/37250531_302.jpg?x=1"),
            "37250531_302.jpg"
        );
        assert_eq!(media_filename("audio/hallo.mp3"), "hallo.mp3");
    }

    #[tokio::test]
    async fn test_download_is_idempotent() {
        let cache = MediaCache::new(scratch_dir("idempotent"));
        cache.ensure_dir().await.unwrap();
        let source = CountingSource::new(b"ID3 audio", 200);
        let path = cache.dir().join("hallo.mp3");

        let first = ensure_local(&source, "https://x/hallo.mp3", &path).await.unwrap();
        let second = ensure_local(&source, "https://x/hallo.mp3", &path).await.unwrap();

        assert_eq!(first, DownloadOutcome::Downloaded);
        assert_eq!(second, DownloadOutcome::Cached);
        assert_eq!(source.downloads.get(), 1);

        let _ = std::fs::remove_dir_all(cache.dir());
    }

    #[tokio::test]
    async fn test_fetch_encodes_payload() {
        let cache = MediaCache::new(scratch_dir("encode"));
        cache.ensure_dir().await.unwrap();
        let source = CountingSource::new(b"hello", 200);

        let asset = cache
            .fetch(&source, "https://x/media/greeting.mp3")
            .await
            .unwrap();

        assert_eq!(asset.filename, "greeting.mp3");
        assert_eq!(asset.path, cache.dir().join("greeting.mp3"));
        assert_eq!(asset.data, "aGVsbG8=");

        let _ = std::fs::remove_dir_all(cache.dir());
    }

    #[tokio::test]
    async fn test_non_ok_status_writes_nothing() {
        let cache = MediaCache::new(scratch_dir("status"));
        cache.ensure_dir().await.unwrap();
        let source = CountingSource::new(b"", 404);
        let path = cache.dir().join("missing.jpg");

        let outcome = ensure_local(&source, "https://x/missing.jpg", &path).await.unwrap();
        assert_eq!(outcome, DownloadOutcome::Skipped { status: 404 });
        assert!(!path.exists());

        // Encoding what was never written is an I/O error.
        assert!(cache.fetch(&source, "https://x/missing.jpg").await.is_err());

        let _ = std::fs::remove_dir_all(cache.dir());
    }
}
