//! # Streaming Configuration
//!
//! Configuration for the simulated stream, the refresher and retention

use kanshi_aggregate::WindowConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StreamError;

/// Streaming configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Simulated producer configuration
    pub generator: GeneratorConfig,

    /// Dashboard refresh configuration
    pub refresh: RefreshConfig,

    /// Event store retention
    pub retention: RetentionConfig,
}

/// Simulated producer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Lower bound of the inter-arrival delay, inclusive
    pub min_delay_ms: u64,

    /// Upper bound of the inter-arrival delay, exclusive
    pub max_delay_ms: u64,

    /// Probability that a payload is drawn from the XSS samples
    pub xss_ratio: f64,

    /// Threat level weights
    pub level_weights: LevelWeights,

    /// Attack status weights
    pub status_weights: StatusWeights,

    /// Fixed RNG seed for reproducible streams
    pub seed: Option<u64>,
}

/// Threat level weights, walked in INFO, WARNING, CRITICAL order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelWeights {
    pub info: f64,
    pub warning: f64,
    pub critical: f64,
}

/// Attack status weights, walked in BLOCKED, SUCCESS, PENDING order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusWeights {
    pub blocked: f64,
    pub success: f64,
    pub pending: f64,
}

/// Dashboard refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Refresh cadence in milliseconds
    pub interval_ms: u64,

    /// Window used for the trend view
    pub window: WindowConfig,
}

/// Event store retention. Both limits are off by default, so the
/// distribution stays cumulative over every event seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Drop events older than this many milliseconds on every refresh
    pub max_age_ms: Option<i64>,

    /// Keep at most this many events, dropping the oldest on append
    pub max_retained: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 50,
            max_delay_ms: 200,
            xss_ratio: 0.1,
            level_weights: LevelWeights::default(),
            status_weights: StatusWeights::default(),
            seed: None,
        }
    }
}

impl Default for LevelWeights {
    fn default() -> Self {
        Self {
            info: 0.6,
            warning: 0.3,
            critical: 0.1,
        }
    }
}

impl Default for StatusWeights {
    fn default() -> Self {
        Self {
            blocked: 0.7,
            success: 0.2,
            pending: 0.1,
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            window: WindowConfig::default(),
        }
    }
}

impl StreamingConfig {
    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, StreamError> {
        let config: StreamingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        self.generator.validate()?;

        if self.refresh.interval_ms == 0 {
            return Err(StreamError::ConfigError("refresh.interval_ms must be positive".to_string()));
        }
        if matches!(self.retention.max_age_ms, Some(age) if age < 0) {
            return Err(StreamError::ConfigError("retention.max_age_ms must not be negative".to_string()));
        }
        if self.retention.max_retained == Some(0) {
            return Err(StreamError::ConfigError("retention.max_retained must be positive".to_string()));
        }
        Ok(())
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), StreamError> {
        if self.min_delay_ms > self.max_delay_ms {
            return Err(StreamError::ConfigError(format!(
                "generator delay range is empty: {}..{}",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.xss_ratio) {
            return Err(StreamError::ConfigError(format!(
                "generator.xss_ratio must be within [0, 1], got {}",
                self.xss_ratio
            )));
        }
        validate_weights(
            "level_weights",
            &[self.level_weights.info, self.level_weights.warning, self.level_weights.critical],
        )?;
        validate_weights(
            "status_weights",
            &[self.status_weights.blocked, self.status_weights.success, self.status_weights.pending],
        )
    }
}

fn validate_weights(name: &str, weights: &[f64]) -> Result<(), StreamError> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(StreamError::ConfigError(format!(
            "{} must be finite and non-negative",
            name
        )));
    }
    Ok(())
}
