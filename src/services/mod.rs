pub mod anki;
pub mod fetcher;
pub mod importer;
pub mod media;
pub mod parser;

pub use anki::{AnkiConnect, FlashcardApi, NewNote};
pub use fetcher::{HttpFetcher, PageSource};
pub use importer::Importer;
pub use media::MediaCache;
pub use parser::LessonParser;
