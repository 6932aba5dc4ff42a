//! API request handlers

use axum::extract::{Extension, Json, Query};
use axum::response::Json as JsonResponse;
use kanshi_aggregate::{
    bucketize, dashboard_snapshot, tally, tally_levels, DashboardSnapshot, DistributionView, WindowConfig,
};
use kanshi_core::Clock;
use kanshi_domain_cyber::PayloadClassifier;
use kanshi_streaming::{EventStore, SnapshotReceiver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::models::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: EventStore,
    pub classifier: Arc<PayloadClassifier>,
    pub clock: Arc<dyn Clock>,
    /// Window used when a request does not override it
    pub window: WindowConfig,
    /// Latest snapshot of a running refresher, if any
    pub snapshots: Option<SnapshotReceiver>,
    pub requests: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: EventStore, classifier: Arc<PayloadClassifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            classifier,
            clock,
            window: WindowConfig::default(),
            snapshots: None,
            requests: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_snapshots(mut self, snapshots: SnapshotReceiver) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    fn count_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

/// Health check handler
pub async fn health_check(Extension(state): Extension<Arc<AppState>>) -> JsonResponse<ApiResponse<HealthResponse>> {
    state.count_request();

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    };

    JsonResponse(ApiResponse::success(response))
}

/// Bucketed severity trend over the sliding window
pub async fn get_trend(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Result<JsonResponse<ApiResponse<TrendResponse>>, ApiError> {
    state.count_request();

    let config = match (query.window_ms, query.bucket_ms) {
        (None, None) => state.window,
        (window_ms, bucket_ms) => WindowConfig::new(
            window_ms.unwrap_or(state.window.window_duration_ms()),
            bucket_ms.unwrap_or(state.window.bucket_width_ms()),
        )
        .map_err(|e| ApiError::BadRequest(e.to_string()))?,
    };

    let now_ms = state.clock.now_ms();
    let window = state.store.read_with(|logs| bucketize(logs, now_ms, &config)).await;
    debug!(buckets = window.len(), dropped = window.dropped, "trend computed");

    let response = TrendResponse {
        generated_at_ms: now_ms,
        window_start_ms: window.start_ms,
        bucket_width_ms: config.bucket_width_ms(),
        series: window.series(),
        dropped: window.dropped,
    };

    Ok(JsonResponse(ApiResponse::success(response)))
}

/// Cumulative status distribution
pub async fn get_distribution(Extension(state): Extension<Arc<AppState>>) -> JsonResponse<ApiResponse<DistributionView>> {
    state.count_request();

    let distribution = state.store.distribution().await;
    JsonResponse(ApiResponse::success(distribution.view()))
}

/// Totals by level and status
pub async fn get_stats(Extension(state): Extension<Arc<AppState>>) -> JsonResponse<ApiResponse<StatsResponse>> {
    state.count_request();

    let response = state
        .store
        .read_with(|logs| StatsResponse {
            total_logs: logs.len(),
            levels: tally_levels(logs),
            distribution: tally(logs),
        })
        .await;

    JsonResponse(ApiResponse::success(response))
}

/// Latest refresher snapshot, or one computed on demand
pub async fn get_dashboard(Extension(state): Extension<Arc<AppState>>) -> JsonResponse<ApiResponse<DashboardSnapshot>> {
    state.count_request();

    let published = state.snapshots.as_ref().and_then(|rx| rx.borrow().clone());
    let snapshot = match published {
        Some(snapshot) => DashboardSnapshot::clone(&snapshot),
        None => {
            let now_ms = state.clock.now_ms();
            let window = state.window;
            state.store.read_with(|logs| dashboard_snapshot(logs, now_ms, &window)).await
        }
    };

    JsonResponse(ApiResponse::success(snapshot))
}

/// Newest logs first, each with its payload verdict
pub async fn list_logs(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> JsonResponse<ApiResponse<Vec<LogEntry>>> {
    state.count_request();

    let entries = state
        .store
        .recent(query.limit)
        .await
        .into_iter()
        .map(|log| LogEntry {
            xss_detected: state.classifier.is_xss_payload(&log.payload),
            rendered_payload: state.classifier.render_payload(&log.payload, query.safe_mode),
            log,
        })
        .collect();

    JsonResponse(ApiResponse::success(entries))
}

/// Append one log
pub async fn submit_log(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<SubmitLogRequest>,
) -> Result<JsonResponse<ApiResponse<SubmitLogResponse>>, ApiError> {
    state.count_request();

    let log = request.into_log(state.clock.now_ms());
    log.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let id = log.id.clone();
    state.store.add_log(log).await;
    let total_logs = state.store.total_logs().await;
    debug!(%id, total_logs, "log submitted");

    Ok(JsonResponse(ApiResponse::success(SubmitLogResponse { id, total_logs })))
}

/// Remove every log
pub async fn clear_logs(Extension(state): Extension<Arc<AppState>>) -> JsonResponse<ApiResponse<ClearLogsResponse>> {
    state.count_request();

    let removed = state.store.clear_logs().await;
    info!(removed, "logs cleared");

    JsonResponse(ApiResponse::success(ClearLogsResponse { removed }))
}
