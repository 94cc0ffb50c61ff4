use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file not found: {path}")]
    FileNotFound { path: String },

    #[error("extraction error in {path}: {detail}")]
    Extraction { path: String, detail: String },

    #[error("unsupported document format: {ext}")]
    UnsupportedFormat { ext: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid slide response: {0}")]
    SlideResponse(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
