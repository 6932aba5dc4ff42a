//! # Window Configuration
//!
//! Trailing window and bucket width for the time-series view

use serde::{Deserialize, Serialize};

use crate::error::AggregateError;

/// Default trailing span covered by the time-series view
pub const DEFAULT_WINDOW_DURATION_MS: i64 = 60_000;

/// Default width of one bucket
pub const DEFAULT_BUCKET_WIDTH_MS: i64 = 5_000;

/// Upper bound on `window_duration_ms / bucket_width_ms`
pub const MAX_BUCKETS: i64 = 10_000;

/// Validated window parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowSettings")]
pub struct WindowConfig {
    window_duration_ms: i64,
    bucket_width_ms: i64,
}

impl WindowConfig {
    /// Create a window config.
    ///
    /// Rejects a non-positive width, a negative duration, and any window
    /// split into more than [`MAX_BUCKETS`] buckets.
    pub fn new(window_duration_ms: i64, bucket_width_ms: i64) -> Result<Self, AggregateError> {
        if bucket_width_ms <= 0 {
            return Err(AggregateError::InvalidWindow(format!(
                "bucket width must be positive, got {} ms",
                bucket_width_ms
            )));
        }
        if window_duration_ms < 0 {
            return Err(AggregateError::InvalidWindow(format!(
                "duration must not be negative, got {} ms",
                window_duration_ms
            )));
        }
        let requested = window_duration_ms / bucket_width_ms;
        if requested > MAX_BUCKETS {
            return Err(AggregateError::TooManyBuckets {
                requested,
                max: MAX_BUCKETS,
            });
        }

        Ok(Self {
            window_duration_ms,
            bucket_width_ms,
        })
    }

    pub fn window_duration_ms(&self) -> i64 {
        self.window_duration_ms
    }

    pub fn bucket_width_ms(&self) -> i64 {
        self.bucket_width_ms
    }

    /// Start of the oldest bucket for the given instant.
    /// Always a multiple of the bucket width, never after `now_ms - window`.
    pub fn window_start(&self, now_ms: i64) -> i64 {
        bucket_floor(now_ms.saturating_sub(self.window_duration_ms), self.bucket_width_ms)
    }

    /// Start of the bucket that owns `timestamp_ms`
    pub fn bucket_key(&self, timestamp_ms: i64) -> i64 {
        bucket_floor(timestamp_ms, self.bucket_width_ms)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_duration_ms: DEFAULT_WINDOW_DURATION_MS,
            bucket_width_ms: DEFAULT_BUCKET_WIDTH_MS,
        }
    }
}

/// Integer floor to a multiple of `width`, correct for negative instants too.
/// Saturates at `i64::MIN` when the floor is not representable.
fn bucket_floor(instant_ms: i64, width: i64) -> i64 {
    instant_ms
        .div_euclid(width)
        .checked_mul(width)
        .unwrap_or(i64::MIN)
}

#[derive(Debug, Deserialize)]
struct WindowSettings {
    #[serde(default = "default_window_duration")]
    window_duration_ms: i64,
    #[serde(default = "default_bucket_width")]
    bucket_width_ms: i64,
}

fn default_window_duration() -> i64 {
    DEFAULT_WINDOW_DURATION_MS
}

fn default_bucket_width() -> i64 {
    DEFAULT_BUCKET_WIDTH_MS
}

impl TryFrom<WindowSettings> for WindowConfig {
    type Error = AggregateError;

    fn try_from(settings: WindowSettings) -> Result<Self, Self::Error> {
        WindowConfig::new(settings.window_duration_ms, settings.bucket_width_ms)
    }
}
