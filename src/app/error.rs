use thiserror::Error;

#[derive(Error, Debug)]
pub enum MushafError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to load surah {chapter}: {message}")]
    Fetch { chapter: u16, message: String },

    #[error("Unexpected API response: {0}")]
    Api(String),

    #[error("Audio failed to start: {0}")]
    PlaybackStart(String),

    #[error("Invalid verse reference: {0}")]
    InvalidVerse(String),

    #[error("Surah {0} does not exist (expected 1-114)")]
    ChapterOutOfRange(u16),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MushafError>;
