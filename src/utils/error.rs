use std::error::Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceRefError {
    #[error("Archive read failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed build metadata: {reason}")]
    MalformedMetadata { reason: String },

    #[error("Source reference is missing '{key}'")]
    MissingReferenceKey { key: &'static str },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, SourceRefError>;

/// Declared failure raised by a pluggable finder. The registry isolates this
/// kind; everything else a finder does wrong propagates.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct FinderError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl FinderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
