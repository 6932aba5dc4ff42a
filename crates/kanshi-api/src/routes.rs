//! API route definitions

use axum::{
    extract::Extension,
    routing::get,
    Router,
};
use kanshi_observability::{routes::monitoring_routes, HealthMonitor};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::*;

/// Create the main API router
pub fn create_router(state: Arc<AppState>, monitor: Arc<dyn HealthMonitor>) -> Router {
    Router::new()
        .route("/health", get(health_check))

        // Dashboard views
        .route("/api/trend", get(get_trend))
        .route("/api/distribution", get(get_distribution))
        .route("/api/stats", get(get_stats))
        .route("/api/dashboard", get(get_dashboard))

        // Log management
        .route("/api/logs", get(list_logs).post(submit_log).delete(clear_logs))

        .nest("/monitoring", monitoring_routes(monitor))

        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
