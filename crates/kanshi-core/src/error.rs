//! Core error types

/// Errors raised while reading or validating attack logs
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
