//! # DW Anki
//!
//! Scrapes the vocabulary pages of a DW Learn German course and imports every
//! entry as an Anki note through AnkiConnect, together with its picture and
//! pronunciation audio.
//!
//! ## Example Usage
//!
//! ```no_run
//! use dw_anki::{AnkiConnect, HttpFetcher, ImportConfig, Importer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ImportConfig::default();
//!     let anki = AnkiConnect::new(config.anki_url.clone());
//!
//!     let importer = Importer::new(config, HttpFetcher::new(), anki)?;
//!     let summary = importer.run().await?;
//!
//!     println!("Added {} cards", summary.total_added());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

pub use error::{AnkiError, DwAnkiError, Result};
pub use services::{
    AnkiConnect, FlashcardApi, HttpFetcher, Importer, LessonParser, MediaCache, PageSource,
};
pub use types::{Flashcard, ImportConfig, LessonReport, RunSummary, VocabularyEntry};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::anki::parse_response;
    use serde_json::json;

    #[test]
    fn test_basic_workflow() {
        let lesson_page = r#"<html><body>
            <div class="row vocabulary ">
              <div><strong dir="auto">die Lampe</strong><div><p>Plural: die Lampen</p></div></div>
              <div><img class="img-responsive" src="/image/lampe.jpg"></div>
              <div><div><p>the lamp</p></div></div>
            </div>
        </body></html>"#;

        let parser = LessonParser::new("https://learngerman.dw.com/").unwrap();
        let lesson = parser
            .lesson_name("https://learngerman.dw.com/en/nicos-weg/l-1/lv")
            .unwrap();
        assert_eq!(lesson, "nicos-weg");

        let rows = parser.extract_rows(lesson_page);
        assert_eq!(rows.len(), 1);

        let entry = rows.into_iter().next().unwrap().unwrap();
        assert_eq!(entry.english, "the lamp");
        assert!(entry.german.starts_with("die Lampe <br><small><i>"));
        assert!(entry.audio_url.is_none());
        assert_eq!(
            services::media::media_filename(entry.image_url.as_deref().unwrap()),
            "lampe.jpg"
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.deck, "DW Nicos Weg A1");
        assert_eq!(config.model, "Basic");
        assert_eq!(config.anki_url, "http://localhost:8765");
        assert_eq!(config.images_dir, std::path::PathBuf::from("images"));
        assert_eq!(config.audio_dir, std::path::PathBuf::from("audio"));
    }

    #[test]
    fn test_error_kinds_stay_distinct() {
        let warning: DwAnkiError = parse_response(json!({ "result": null, "error": "duplicate" }))
            .unwrap_err()
            .into();
        let protocol: DwAnkiError = parse_response(json!({ "result": null }))
            .unwrap_err()
            .into();

        assert!(matches!(warning, DwAnkiError::Anki(AnkiError::Warning(_))));
        assert!(matches!(protocol, DwAnkiError::Anki(AnkiError::Protocol(_))));
    }
}
