//! Owned handle over a background tokio task with a shutdown signal

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::StreamError;

#[derive(Debug)]
pub(crate) struct TaskHandle {
    join: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TaskHandle {
    /// Spawn `body`, handing it the receiving end of the shutdown signal
    pub(crate) fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(oneshot::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let join = tokio::spawn(body(shutdown_rx));

        Self {
            join: Some(join),
            shutdown: Some(shutdown),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|join| !join.is_finished())
    }

    /// Signal shutdown and wait for the task. Calling it again is a no-op.
    pub(crate) async fn stop(&mut self) -> Result<(), StreamError> {
        if let Some(shutdown) = self.shutdown.take() {
            // the task may already have exited on its own
            let _ = shutdown.send(());
        }
        match self.join.take() {
            Some(join) => join.await.map_err(|e| StreamError::TaskFailed(e.to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}
