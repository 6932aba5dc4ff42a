//! # Stream Session
//!
//! Explicitly owned simulated stream. Each session drives one producer
//! task; stopping or dropping the session ends it.

use kanshi_core::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::StreamError;
use crate::generator::EventGenerator;
use crate::store::EventStore;
use crate::task::TaskHandle;

/// Running simulated attack stream
#[derive(Debug)]
pub struct StreamSession {
    task: TaskHandle,
    produced: Arc<AtomicU64>,
}

impl StreamSession {
    /// Start appending generated logs to `store`. The first log is produced
    /// immediately, then one after every generator delay.
    pub fn start(store: EventStore, mut generator: EventGenerator, clock: Arc<dyn Clock>) -> Self {
        let produced = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&produced);

        let task = TaskHandle::spawn(move |mut shutdown| async move {
            info!("Starting simulated attack stream");

            loop {
                let log = generator.generate(clock.now_ms());
                debug!(id = %log.id, level = %log.level, status = %log.status, "generated log");
                store.add_log(log).await;
                counter.fetch_add(1, Ordering::Relaxed);

                let delay = generator.next_delay();
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            info!(produced = counter.load(Ordering::Relaxed), "Simulated attack stream stopped");
        });

        Self { task, produced }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// Number of logs appended so far
    pub fn produced(&self) -> u64 {
        self.produced.load(Ordering::Relaxed)
    }

    /// Shared handle on the produced counter, readable after the session moves
    pub fn produced_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.produced)
    }

    /// Stop the stream and wait for the producer task to finish
    pub async fn stop(&mut self) -> Result<(), StreamError> {
        self.task.stop().await
    }
}
