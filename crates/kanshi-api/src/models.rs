//! API request and response models

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use kanshi_aggregate::{Distribution, LevelCounts, TrendSeries};
use kanshi_core::{AttackLog, AttackStatus, ThreatLevel};
use serde::{Deserialize, Serialize};

/// Envelope for every API response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// API errors mapped onto HTTP status codes
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Optional window overrides for the trend view
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendQuery {
    pub window_ms: Option<i64>,
    pub bucket_ms: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendResponse {
    pub generated_at_ms: i64,
    pub window_start_ms: i64,
    pub bucket_width_ms: i64,
    pub series: TrendSeries,
    pub dropped: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_logs: usize,
    pub levels: LevelCounts,
    pub distribution: Distribution,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogsQuery {
    #[serde(default = "default_logs_limit")]
    pub limit: usize,
    #[serde(default = "default_safe_mode")]
    pub safe_mode: bool,
}

fn default_logs_limit() -> usize {
    50
}

fn default_safe_mode() -> bool {
    true
}

/// Attack log with its payload classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(flatten)]
    pub log: AttackLog,
    pub xss_detected: bool,
    /// Payload as it should be displayed for the requested mode
    pub rendered_payload: String,
}

/// Log submission; `id` and `timestamp` are filled in when omitted
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitLogRequest {
    pub id: Option<String>,
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub source_ip: String,
    #[serde(default)]
    pub target_port: u16,
    #[serde(default)]
    pub payload: String,
    #[serde(default = "ThreatLevel::missing")]
    pub level: ThreatLevel,
    #[serde(default = "AttackStatus::missing")]
    pub status: AttackStatus,
}

impl SubmitLogRequest {
    pub fn into_log(self, now_ms: i64) -> AttackLog {
        AttackLog {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            timestamp: self.timestamp.unwrap_or(now_ms),
            source_ip: self.source_ip,
            target_port: self.target_port,
            payload: self.payload,
            level: self.level,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitLogResponse {
    pub id: String,
    pub total_logs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearLogsResponse {
    pub removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = ApiError::BadRequest("bucket width must be positive".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_envelope() {
        let response = ApiResponse::<()>::error("boom".to_string());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.as_deref(), Some("boom"));
    }
}
