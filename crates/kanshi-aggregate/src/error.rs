//! Aggregation errors

/// Raised when window parameters cannot describe a bucketed window.
/// Aggregation itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Invalid window: {requested} buckets requested, at most {max} allowed")]
    TooManyBuckets { requested: i64, max: i64 },
}
