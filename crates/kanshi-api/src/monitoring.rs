//! Pipeline health monitor backing the `/monitoring` routes

use chrono::Utc;
use kanshi_aggregate::{tally, tally_levels, FallbackHits};
use kanshi_core::Clock;
use kanshi_observability::{HealthCheck, HealthMonitor, HealthStatus, PipelineMetrics};
use kanshi_streaming::{EventStore, SnapshotReceiver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::handlers::AppState;

/// Snapshots older than this many refresh intervals count as stale
const STALE_INTERVALS: i64 = 3;

/// Health monitor over the store, the refresher and the simulated stream
#[derive(Clone)]
pub struct PipelineMonitor {
    store: EventStore,
    clock: Arc<dyn Clock>,
    snapshots: Option<SnapshotReceiver>,
    refresh_interval_ms: i64,
    produced: Option<Arc<AtomicU64>>,
    requests: Arc<AtomicU64>,
    start_time: Instant,
}

impl PipelineMonitor {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            clock: Arc::clone(&state.clock),
            snapshots: state.snapshots.clone(),
            refresh_interval_ms: 1_000,
            produced: None,
            requests: Arc::clone(&state.requests),
            start_time: state.start_time,
        }
    }

    /// Refresh cadence used to judge snapshot staleness
    pub fn with_refresh_interval_ms(mut self, interval_ms: i64) -> Self {
        self.refresh_interval_ms = interval_ms.max(1);
        self
    }

    /// Report the produced count of a running stream session
    pub fn with_produced_counter(mut self, produced: Arc<AtomicU64>) -> Self {
        self.produced = Some(produced);
        self
    }

    async fn fallback_hits(&self) -> FallbackHits {
        if let Some(snapshot) = self.latest_snapshot() {
            return snapshot.fallback;
        }
        self.store
            .read_with(|logs| tally_levels(logs).fallback.merge(&tally(logs).fallback))
            .await
    }

    fn latest_snapshot(&self) -> Option<Arc<kanshi_aggregate::DashboardSnapshot>> {
        self.snapshots.as_ref().and_then(|rx| rx.borrow().clone())
    }

    async fn check_store(&self) -> HealthCheck {
        let start = Instant::now();
        let total_logs = self.store.total_logs().await;

        HealthCheck {
            name: "store".to_string(),
            status: HealthStatus::Up,
            timestamp: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
            message: Some(format!("{} logs retained", total_logs)),
            details: Some(serde_json::json!({ "total_logs": total_logs })),
        }
    }

    async fn check_categories(&self) -> HealthCheck {
        let start = Instant::now();
        let hits = self.fallback_hits().await;

        let (status, message) = if hits.is_empty() {
            (HealthStatus::Up, "All levels and statuses recognized".to_string())
        } else {
            (
                HealthStatus::Degraded,
                format!(
                    "{} unrecognized levels counted as INFO, {} unrecognized statuses counted as PENDING",
                    hits.levels, hits.statuses
                ),
            )
        };

        HealthCheck {
            name: "categories".to_string(),
            status,
            timestamp: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
            message: Some(message),
            details: Some(serde_json::json!({
                "fallback_levels": hits.levels,
                "fallback_statuses": hits.statuses,
            })),
        }
    }

    fn check_refresher(&self, rx: &SnapshotReceiver) -> HealthCheck {
        let start = Instant::now();
        let now_ms = self.clock.now_ms();
        let latest = rx.borrow().clone();

        let (status, message, age_ms) = if rx.has_changed().is_err() {
            (HealthStatus::Down, "Refresher stopped".to_string(), None)
        } else {
            match latest {
                None => (HealthStatus::Degraded, "No snapshot published yet".to_string(), None),
                Some(snapshot) => {
                    let age_ms = now_ms - snapshot.generated_at_ms;
                    if age_ms > self.refresh_interval_ms * STALE_INTERVALS {
                        (HealthStatus::Degraded, format!("Snapshot is {} ms old", age_ms), Some(age_ms))
                    } else {
                        (HealthStatus::Up, "Snapshots current".to_string(), Some(age_ms))
                    }
                }
            }
        };

        HealthCheck {
            name: "refresher".to_string(),
            status,
            timestamp: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
            message: Some(message),
            details: Some(serde_json::json!({ "snapshot_age_ms": age_ms })),
        }
    }
}

#[async_trait::async_trait]
impl HealthMonitor for PipelineMonitor {
    async fn get_overall_health(&self) -> HealthStatus {
        self.run_health_checks()
            .await
            .iter()
            .fold(HealthStatus::Up, |acc, check| acc.combine(check.status))
    }

    async fn run_health_checks(&self) -> Vec<HealthCheck> {
        let mut checks = vec![self.check_store().await, self.check_categories().await];
        if let Some(rx) = &self.snapshots {
            checks.push(self.check_refresher(rx));
        }
        checks
    }

    async fn get_metrics(&self) -> PipelineMetrics {
        let latest = self.latest_snapshot();
        let fallback = self.fallback_hits().await;

        PipelineMetrics {
            timestamp: Utc::now(),
            total_logs: self.store.total_logs().await as u64,
            produced_logs: self.produced.as_ref().map(|p| p.load(Ordering::Relaxed)),
            fallback_levels: fallback.levels,
            fallback_statuses: fallback.statuses,
            dropped_events: latest.as_ref().map_or(0, |s| s.dropped),
            last_refresh_ms: latest.as_ref().map(|s| s.generated_at_ms),
            total_requests: self.requests.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}
