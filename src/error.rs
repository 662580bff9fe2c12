use thiserror::Error;

#[derive(Error, Debug)]
pub enum DwAnkiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP status error: {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Row {row} has no {field} text")]
    MissingField { field: &'static str, row: usize },

    #[error("No lesson name in URL: {url}")]
    LessonName { url: String },

    #[error("Invalid selector: {reason}")]
    Selector { reason: String },

    #[error(transparent)]
    Anki(#[from] AnkiError),
}

/// Failures reported by the AnkiConnect endpoint.
#[derive(Error, Debug)]
pub enum AnkiError {
    /// The call went through but Anki refused it, e.g. a duplicate note.
    #[error("{0}")]
    Warning(String),

    /// The response did not have the `{result, error}` shape.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("AnkiConnect request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AnkiError {
    pub fn is_warning(&self) -> bool {
        matches!(self, AnkiError::Warning(_))
    }
}

pub type Result<T> = std::result::Result<T, DwAnkiError>;
pub type AnkiResult<T> = std::result::Result<T, AnkiError>;
