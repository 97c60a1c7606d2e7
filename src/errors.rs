use thiserror::Error;

/// Error type covering statement loading, record decoding and configuration.
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Failed to load statements from {source_name}: {message}")]
    Load {
        source_name: String,
        message: String,
    },
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StatementError>;

impl StatementError {
    /// Wraps any lower-level failure into a load error tagged with its source.
    pub fn load(source_name: impl Into<String>, err: impl std::fmt::Display) -> Self {
        StatementError::Load {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }
}
