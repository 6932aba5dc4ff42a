//! Streaming errors

/// Stream error
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}
