use std::path::PathBuf;

pub const DEFAULT_SITE_URL: &str = "https://learngerman.dw.com/";
pub const DEFAULT_COURSE_URL: &str = "https://learngerman.dw.com/en/beginners/c-36519789";
pub const DEFAULT_DECK: &str = "DW Nicos Weg A1";
pub const DEFAULT_MODEL: &str = "Basic";
pub const DEFAULT_ANKI_URL: &str = "http://localhost:8765";

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub site_url: String,
    pub course_url: String,
    pub deck: String,
    pub model: String,
    pub anki_url: String,
    pub images_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            course_url: DEFAULT_COURSE_URL.to_string(),
            deck: DEFAULT_DECK.to_string(),
            model: DEFAULT_MODEL.to_string(),
            anki_url: DEFAULT_ANKI_URL.to_string(),
            images_dir: PathBuf::from("images"),
            audio_dir: PathBuf::from("audio"),
            log_file: PathBuf::from("run.log"),
        }
    }
}

/// One vocabulary row, reduced to owned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// German word, with the note markup appended when the row has one.
    pub german: String,
    pub english: String,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub filename: String,
    pub path: PathBuf,
    pub data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Cached,
    Downloaded,
    /// The server answered with something other than 200; nothing was written.
    Skipped { status: u16 },
}

#[derive(Debug, Clone, Default)]
pub struct LessonReport {
    pub lesson: String,
    pub url: String,
    pub rows: usize,
    pub added: usize,
    pub duplicates: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub started_at: String,
    pub lessons: Vec<LessonReport>,
}

impl RunSummary {
    pub fn total_added(&self) -> usize {
        self.lessons.iter().map(|l| l.added).sum()
    }

    pub fn total_duplicates(&self) -> usize {
        self.lessons.iter().map(|l| l.duplicates).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.lessons.iter().map(|l| l.failed).sum()
    }
}
