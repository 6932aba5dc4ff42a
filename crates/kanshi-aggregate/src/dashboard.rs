//! Combined dashboard views computed from one snapshot and one "now"

use kanshi_core::AttackLog;
use serde::{Deserialize, Serialize};

use crate::config::WindowConfig;
use crate::distribution::{tally, tally_levels, DistributionView, LevelCounts};
use crate::fallback::FallbackHits;
use crate::window::{bucketize, TrendSeries};

/// Everything the dashboard renders for one refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub generated_at_ms: i64,
    pub window_start_ms: i64,
    pub trend: TrendSeries,
    pub distribution: DistributionView,
    pub levels: LevelCounts,
    pub total_logs: usize,
    /// Fallback hits across the whole collection
    pub fallback: FallbackHits,
    /// Events with timestamps after `generated_at_ms`
    pub dropped: u64,
}

/// Compute both views over the same snapshot and the same instant
pub fn dashboard_snapshot(events: &[AttackLog], now_ms: i64, config: &WindowConfig) -> DashboardSnapshot {
    let window = bucketize(events, now_ms, config);
    let distribution = tally(events);
    let levels = tally_levels(events);

    DashboardSnapshot {
        generated_at_ms: now_ms,
        window_start_ms: window.start_ms,
        trend: window.series(),
        distribution: distribution.view(),
        fallback: levels.fallback.merge(&distribution.fallback),
        levels,
        total_logs: events.len(),
        dropped: window.dropped,
    }
}
