//! # Event Store
//!
//! Append-only attack log collection shared between the producer and the
//! dashboard. Readers get point-in-time snapshots; the aggregation never
//! sees the list while it is being written.

use kanshi_aggregate::{tally, tally_levels, Distribution, LevelCounts};
use kanshi_core::AttackLog;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Cloneable handle over the shared log list
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    logs: Arc<RwLock<Vec<AttackLog>>>,
    max_retained: Option<usize>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that keeps at most `max_retained` logs, dropping the oldest
    pub fn with_max_retained(max_retained: usize) -> Self {
        Self {
            logs: Arc::default(),
            max_retained: Some(max_retained.max(1)),
        }
    }

    pub async fn add_log(&self, log: AttackLog) {
        let mut logs = self.logs.write().await;
        logs.push(log);
        self.enforce_cap(&mut logs);
    }

    pub async fn extend(&self, batch: impl IntoIterator<Item = AttackLog>) {
        let mut logs = self.logs.write().await;
        logs.extend(batch);
        self.enforce_cap(&mut logs);
    }

    /// Remove every log, returning how many there were
    pub async fn clear_logs(&self) -> usize {
        let mut logs = self.logs.write().await;
        let removed = logs.len();
        logs.clear();
        removed
    }

    /// Owned copy of every log in insertion order
    pub async fn snapshot(&self) -> Vec<AttackLog> {
        self.logs.read().await.clone()
    }

    /// Run `f` over a consistent view of the logs without copying them
    pub async fn read_with<R>(&self, f: impl FnOnce(&[AttackLog]) -> R) -> R {
        let logs = self.logs.read().await;
        f(&logs)
    }

    pub async fn total_logs(&self) -> usize {
        self.logs.read().await.len()
    }

    pub async fn level_counts(&self) -> LevelCounts {
        self.read_with(tally_levels).await
    }

    pub async fn distribution(&self) -> Distribution {
        self.read_with(tally).await
    }

    /// Up to `limit` logs, most recently appended first
    pub async fn recent(&self, limit: usize) -> Vec<AttackLog> {
        self.logs.read().await.iter().rev().take(limit).cloned().collect()
    }

    /// Drop logs with `timestamp < cutoff_ms`, returning how many were removed
    pub async fn prune_older_than(&self, cutoff_ms: i64) -> usize {
        let mut logs = self.logs.write().await;
        let before = logs.len();
        logs.retain(|log| log.timestamp >= cutoff_ms);
        let removed = before - logs.len();
        if removed > 0 {
            debug!(removed, cutoff_ms, "pruned expired logs");
        }
        removed
    }

    fn enforce_cap(&self, logs: &mut Vec<AttackLog>) {
        if let Some(max) = self.max_retained {
            if logs.len() > max {
                let excess = logs.len() - max;
                logs.drain(..excess);
            }
        }
    }
}
