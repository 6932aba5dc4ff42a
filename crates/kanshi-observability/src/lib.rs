//! Observability (health/metrics) abstractions and Axum routes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
    Degraded,
}

impl HealthStatus {
    /// Worst of two statuses
    pub fn combine(self, other: HealthStatus) -> HealthStatus {
        use HealthStatus::*;
        match (self, other) {
            (Down, _) | (_, Down) => Down,
            (Degraded, _) | (_, Degraded) => Degraded,
            _ => Up,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

/// Aggregation pipeline counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetrics {
    pub timestamp: DateTime<Utc>,
    pub total_logs: u64,
    /// Logs appended by the simulated stream, if one is running
    pub produced_logs: Option<u64>,
    /// Retained logs whose level was counted as INFO
    pub fallback_levels: u64,
    /// Retained logs whose status was counted as PENDING
    pub fallback_statuses: u64,
    /// Events ahead of the refresh clock at the last refresh
    pub dropped_events: u64,
    pub last_refresh_ms: Option<i64>,
    pub total_requests: u64,
    pub uptime_seconds: u64,
}

#[async_trait::async_trait]
pub trait HealthMonitor: Send + Sync + 'static {
    async fn get_overall_health(&self) -> HealthStatus;
    async fn run_health_checks(&self) -> Vec<HealthCheck>;
    async fn get_metrics(&self) -> PipelineMetrics;
}

pub mod routes {
    use super::*;
    use axum::{
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::get,
        Router,
    };
    use std::sync::Arc;

    pub fn monitoring_routes(monitor: Arc<dyn HealthMonitor>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/health/detailed", get(health_detailed))
            .route("/metrics", get(metrics))
            .with_state(monitor)
    }

    async fn health(State(m): State<Arc<dyn HealthMonitor>>) -> impl IntoResponse {
        let status = m.get_overall_health().await;
        let status_code = match status {
            HealthStatus::Up => StatusCode::OK,
            HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status_code, Json(status))
    }

    async fn health_detailed(State(m): State<Arc<dyn HealthMonitor>>) -> impl IntoResponse {
        let checks = m.run_health_checks().await;
        Json(checks)
    }

    async fn metrics(State(m): State<Arc<dyn HealthMonitor>>) -> impl IntoResponse {
        let s = m.get_metrics().await;
        Json(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedMonitor(HealthStatus);

    #[async_trait::async_trait]
    impl HealthMonitor for FixedMonitor {
        async fn get_overall_health(&self) -> HealthStatus {
            self.0
        }

        async fn run_health_checks(&self) -> Vec<HealthCheck> {
            vec![HealthCheck {
                name: "fixed".to_string(),
                status: self.0,
                timestamp: Utc::now(),
                duration_ms: 0,
                message: None,
                details: None,
            }]
        }

        async fn get_metrics(&self) -> PipelineMetrics {
            PipelineMetrics {
                timestamp: Utc::now(),
                total_logs: 3,
                produced_logs: None,
                fallback_levels: 1,
                fallback_statuses: 0,
                dropped_events: 0,
                last_refresh_ms: None,
                total_requests: 0,
                uptime_seconds: 0,
            }
        }
    }

    #[test]
    fn test_combine_keeps_worst() {
        assert_eq!(HealthStatus::Up.combine(HealthStatus::Degraded), HealthStatus::Degraded);
        assert_eq!(HealthStatus::Degraded.combine(HealthStatus::Down), HealthStatus::Down);
        assert_eq!(HealthStatus::Up.combine(HealthStatus::Up), HealthStatus::Up);
    }

    #[tokio::test]
    async fn test_health_route_status_codes() {
        let up = routes::monitoring_routes(Arc::new(FixedMonitor(HealthStatus::Up)));
        let response = up
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let down = routes::monitoring_routes(Arc::new(FixedMonitor(HealthStatus::Down)));
        let response = down
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_metrics_route() {
        let app = routes::monitoring_routes(Arc::new(FixedMonitor(HealthStatus::Up)));
        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
