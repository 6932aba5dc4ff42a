//! CLI command definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use kanshi_aggregate::{dashboard_snapshot, WindowConfig};
use kanshi_api::{shutdown_signal, AppState, DashboardServer, PipelineMonitor, ServerConfig};
use kanshi_core::{parse_logs, Clock, SystemClock};
use kanshi_domain_cyber::PayloadClassifier;
use kanshi_streaming::{DashboardRefresher, EventGenerator, EventStore, StreamSession, StreamingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::render::{classify_text, render, snapshot_text, ClassifyReport};

/// Main CLI structure
#[derive(Parser)]
#[command(name = "kanshi")]
#[command(about = "Sliding-window dashboard for security attack logs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Streaming configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a simulated attack stream and print every dashboard refresh
    Simulate {
        /// How long to run
        #[arg(short, long, default_value = "10")]
        duration_secs: u64,

        /// Refresh interval, overrides the configured one
        #[arg(short, long)]
        refresh_ms: Option<u64>,

        /// Generator seed for a reproducible stream
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compute the dashboard views over a JSON file of attack logs
    Aggregate {
        /// Input file containing a JSON array of logs
        #[arg(short, long)]
        input: PathBuf,

        /// Evaluation instant in epoch milliseconds, defaults to now
        #[arg(long)]
        now_ms: Option<i64>,

        /// Window duration, overrides the configured one
        #[arg(long)]
        window_ms: Option<i64>,

        /// Bucket width, overrides the configured one
        #[arg(long)]
        bucket_ms: Option<i64>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Classify a payload and show how it would be rendered
    Classify {
        /// Payload text
        #[arg(short, long)]
        payload: String,

        /// Render the payload sanitized
        #[arg(long)]
        safe_mode: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Feed the store from a simulated stream
        #[arg(long)]
        simulate: bool,
    },

    /// Show system information
    Info,
}

/// Output format options
#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

/// Command execution result
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Execute CLI commands
pub struct CommandExecutor {
    config: StreamingConfig,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self::with_config(StreamingConfig::default())
    }

    pub fn with_config(config: StreamingConfig) -> Self {
        Self { config }
    }

    /// Execute a CLI command
    pub async fn execute(&mut self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::Simulate {
                duration_secs,
                refresh_ms,
                seed,
                format,
            } => self.execute_simulate(duration_secs, refresh_ms, seed, format).await,
            Commands::Aggregate {
                input,
                now_ms,
                window_ms,
                bucket_ms,
                format,
            } => self.execute_aggregate(input, now_ms, window_ms, bucket_ms, format),
            Commands::Classify {
                payload,
                safe_mode,
                format,
            } => self.execute_classify(payload, safe_mode, format),
            Commands::Serve { host, port, simulate } => self.execute_serve(host, port, simulate).await,
            Commands::Info => self.execute_info(),
        }
    }

    fn new_store(&self) -> EventStore {
        match self.config.retention.max_retained {
            Some(max) => EventStore::with_max_retained(max),
            None => EventStore::new(),
        }
    }

    async fn execute_simulate(
        &mut self,
        duration_secs: u64,
        refresh_ms: Option<u64>,
        seed: Option<u64>,
        format: OutputFormat,
    ) -> Result<CommandResult> {
        if let Some(interval_ms) = refresh_ms {
            self.config.refresh.interval_ms = interval_ms;
        }
        if seed.is_some() {
            self.config.generator.seed = seed;
        }
        self.config.validate()?;

        let store = self.new_store();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let generator = EventGenerator::new(&self.config.generator)?;

        let mut session = StreamSession::start(store.clone(), generator, Arc::clone(&clock));
        let mut refresher = DashboardRefresher::new(
            store.clone(),
            clock,
            self.config.refresh.clone(),
            self.config.retention.clone(),
        )
        .start();

        info!(duration_secs, "Simulation running");

        let mut snapshots = refresher.subscribe();
        let deadline = tokio::time::sleep(Duration::from_secs(duration_secs));
        tokio::pin!(deadline);
        let mut refreshes = 0u64;

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let latest = snapshots.borrow_and_update().clone();
                    if let Some(snapshot) = latest {
                        println!("{}", render(snapshot.as_ref(), &format, snapshot_text)?);
                        refreshes += 1;
                    }
                }
            }
        }

        session.stop().await?;
        refresher.stop().await?;

        let produced = session.produced();
        let total_logs = store.total_logs().await;

        Ok(CommandResult {
            success: true,
            message: format!("Simulated {} logs over {} refreshes", produced, refreshes),
            data: Some(serde_json::json!({
                "produced": produced,
                "total_logs": total_logs,
                "refreshes": refreshes,
            })),
        })
    }

    fn execute_aggregate(
        &self,
        input: PathBuf,
        now_ms: Option<i64>,
        window_ms: Option<i64>,
        bucket_ms: Option<i64>,
        format: OutputFormat,
    ) -> Result<CommandResult> {
        let content = std::fs::read_to_string(&input)?;
        let logs = parse_logs(&content)?;

        let base = self.config.refresh.window;
        let window = WindowConfig::new(
            window_ms.unwrap_or(base.window_duration_ms()),
            bucket_ms.unwrap_or(base.bucket_width_ms()),
        )?;
        let now_ms = now_ms.unwrap_or_else(|| SystemClock.now_ms());

        let snapshot = dashboard_snapshot(&logs, now_ms, &window);
        println!("{}", render(&snapshot, &format, snapshot_text)?);

        Ok(CommandResult {
            success: true,
            message: format!("Aggregated {} logs", logs.len()),
            data: Some(serde_json::to_value(&snapshot)?),
        })
    }

    fn execute_classify(&self, payload: String, safe_mode: bool, format: OutputFormat) -> Result<CommandResult> {
        let classifier = PayloadClassifier::new()?;
        let verdict = classifier.classify(&payload);
        let rendered = classifier.render_payload(&payload, safe_mode);
        let report = ClassifyReport::new(&payload, verdict, safe_mode, rendered);

        println!("{}", render(&report, &format, classify_text)?);

        Ok(CommandResult {
            success: true,
            message: if report.xss_detected {
                "XSS payload".to_string()
            } else {
                "Benign payload".to_string()
            },
            data: Some(serde_json::to_value(&report)?),
        })
    }

    async fn execute_serve(&self, host: String, port: u16, simulate: bool) -> Result<CommandResult> {
        self.config.validate()?;

        let store = self.new_store();
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let classifier = Arc::new(PayloadClassifier::new()?);

        let mut state = AppState::new(store.clone(), classifier, Arc::clone(&clock))
            .with_window(self.config.refresh.window);

        let mut session = None;
        let mut refresher = None;
        if simulate {
            let generator = EventGenerator::new(&self.config.generator)?;
            session = Some(StreamSession::start(store.clone(), generator, Arc::clone(&clock)));

            let handle = DashboardRefresher::new(
                store.clone(),
                Arc::clone(&clock),
                self.config.refresh.clone(),
                self.config.retention.clone(),
            )
            .start();
            state = state.with_snapshots(handle.subscribe());
            refresher = Some(handle);
        }

        let mut monitor = PipelineMonitor::new(&state).with_refresh_interval_ms(self.config.refresh.interval_ms as i64);
        if let Some(session) = &session {
            monitor = monitor.with_produced_counter(session.produced_counter());
        }

        let server = DashboardServer::with_monitor(ServerConfig { host: host.clone(), port }, state, Arc::new(monitor));

        println!("Starting server on {}:{}", host, port);
        println!("Press Ctrl+C to stop");

        server.run_with_shutdown(shutdown_signal()).await?;

        if let Some(mut session) = session {
            session.stop().await?;
        }
        if let Some(mut refresher) = refresher {
            refresher.stop().await?;
        }

        Ok(CommandResult {
            success: true,
            message: "Server stopped".to_string(),
            data: None,
        })
    }

    fn execute_info(&self) -> Result<CommandResult> {
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "repository": env!("CARGO_PKG_REPOSITORY"),
            "window_ms": self.config.refresh.window.window_duration_ms(),
            "bucket_ms": self.config.refresh.window.bucket_width_ms(),
            "refresh_ms": self.config.refresh.interval_ms,
            "features": ["sliding-window-trend", "status-distribution", "xss-classification", "rest-api", "cli"]
        });

        let result = serde_json::to_string_pretty(&info)?;
        println!("{}", result);

        Ok(CommandResult {
            success: true,
            message: "System information".to_string(),
            data: Some(info),
        })
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}
