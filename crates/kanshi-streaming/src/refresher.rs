//! # Dashboard Refresher
//!
//! Recomputes the dashboard views on a fixed cadence. Every tick reads the
//! clock once, aggregates one consistent store snapshot and publishes the
//! result on a watch channel.

use kanshi_aggregate::{dashboard_snapshot, DashboardSnapshot};
use kanshi_core::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::{RefreshConfig, RetentionConfig};
use crate::error::StreamError;
use crate::store::EventStore;
use crate::task::TaskHandle;

/// Latest published snapshot, `None` until the first refresh
pub type SnapshotReceiver = watch::Receiver<Option<Arc<DashboardSnapshot>>>;

/// Computes and publishes dashboard snapshots
pub struct DashboardRefresher {
    store: EventStore,
    clock: Arc<dyn Clock>,
    refresh: RefreshConfig,
    retention: RetentionConfig,
    tx: watch::Sender<Option<Arc<DashboardSnapshot>>>,
}

impl DashboardRefresher {
    pub fn new(store: EventStore, clock: Arc<dyn Clock>, refresh: RefreshConfig, retention: RetentionConfig) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            store,
            clock,
            refresh,
            retention,
            tx,
        }
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.tx.subscribe()
    }

    /// Run one refresh: prune if configured, aggregate, publish
    pub async fn refresh_once(&self) -> Arc<DashboardSnapshot> {
        let now_ms = self.clock.now_ms();

        if let Some(max_age) = self.retention.max_age_ms {
            self.store.prune_older_than(now_ms.saturating_sub(max_age)).await;
        }

        let window = self.refresh.window;
        let snapshot = Arc::new(
            self.store
                .read_with(|logs| dashboard_snapshot(logs, now_ms, &window))
                .await,
        );

        if !snapshot.fallback.is_empty() {
            warn!(
                levels = snapshot.fallback.levels,
                statuses = snapshot.fallback.statuses,
                "events with unrecognized categories routed to fallback counters"
            );
        }
        if snapshot.dropped > 0 {
            debug!(dropped = snapshot.dropped, "events ahead of the refresh clock");
        }

        // send_replace keeps the value even when nobody is subscribed
        self.tx.send_replace(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// Refresh on the configured interval until the handle is stopped
    pub fn start(self) -> RefresherHandle {
        let receiver = self.subscribe();
        let period = Duration::from_millis(self.refresh.interval_ms.max(1));

        let task = TaskHandle::spawn(move |mut shutdown| async move {
            info!(interval_ms = period.as_millis() as u64, "Starting dashboard refresher");

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = ticker.tick() => {
                        self.refresh_once().await;
                    }
                }
            }

            info!("Dashboard refresher stopped");
        });

        RefresherHandle { task, receiver }
    }
}

/// Running refresher
#[derive(Debug)]
pub struct RefresherHandle {
    task: TaskHandle,
    receiver: SnapshotReceiver,
}

impl RefresherHandle {
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.receiver.clone()
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.receiver.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    pub async fn stop(&mut self) -> Result<(), StreamError> {
        self.task.stop().await
    }
}
