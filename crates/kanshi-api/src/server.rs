//! HTTP server implementation

use anyhow::Context;
use axum::{serve, Router};
use kanshi_observability::HealthMonitor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::handlers::AppState;
use crate::monitoring::PipelineMonitor;
use crate::routes::create_router;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Dashboard API server
pub struct DashboardServer {
    config: ServerConfig,
    state: Arc<AppState>,
    monitor: Arc<dyn HealthMonitor>,
}

impl DashboardServer {
    /// Server over `state` with a [`PipelineMonitor`] built from it
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let monitor = Arc::new(PipelineMonitor::new(&state));
        Self::with_monitor(config, state, monitor)
    }

    pub fn with_monitor(config: ServerConfig, state: AppState, monitor: Arc<dyn HealthMonitor>) -> Self {
        Self {
            config,
            state: Arc::new(state),
            monitor,
        }
    }

    /// Get the server address
    pub fn address(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .with_context(|| format!("invalid server address {}:{}", self.config.host, self.config.port))
    }

    /// Create the application router
    pub fn create_app(&self) -> Router {
        create_router(Arc::clone(&self.state), Arc::clone(&self.monitor))
    }

    /// Start the server
    pub async fn serve(self) -> anyhow::Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let addr = self.address()?;
        let app = self.create_app();

        info!("Starting Kanshi API server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        info!("Server listening on {}", addr);

        serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| {
                error!("Server error: {}", e);
                e.into()
            })
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
