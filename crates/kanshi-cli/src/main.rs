//! Kanshi CLI main entry point

use anyhow::{Context, Result};
use clap::Parser;
use kanshi_cli::commands::{Cli, CommandExecutor};
use kanshi_streaming::StreamingConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StreamingConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => StreamingConfig::default(),
    };

    let mut executor = CommandExecutor::with_config(config);
    let result = executor.execute(cli.command).await?;

    if result.success {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
