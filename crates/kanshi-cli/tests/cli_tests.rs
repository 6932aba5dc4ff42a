//! Tests for the cli crate

use clap::Parser;
use kanshi_cli::commands::{Cli, CommandExecutor, Commands, OutputFormat};
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_cli_parsing_info() {
    let cli = Cli::try_parse_from(["kanshi", "info"]).unwrap();
    assert!(matches!(cli.command, Commands::Info));
    assert_eq!(cli.config, None);
}

#[test]
fn test_cli_parsing_serve() {
    let cli = Cli::try_parse_from(["kanshi", "serve", "--host", "127.0.0.1", "--port", "8080", "--simulate"]).unwrap();

    match cli.command {
        Commands::Serve { host, port, simulate } => {
            assert_eq!(host, "127.0.0.1");
            assert_eq!(port, 8080);
            assert!(simulate);
        }
        _ => panic!("Expected Serve command"),
    }
}

#[test]
fn test_cli_parsing_simulate_defaults() {
    let cli = Cli::try_parse_from(["kanshi", "simulate"]).unwrap();

    match cli.command {
        Commands::Simulate {
            duration_secs,
            refresh_ms,
            seed,
            format,
        } => {
            assert_eq!(duration_secs, 10);
            assert_eq!(refresh_ms, None);
            assert_eq!(seed, None);
            assert_eq!(format, OutputFormat::Text);
        }
        _ => panic!("Expected Simulate command"),
    }
}

#[test]
fn test_cli_parsing_aggregate() {
    let cli = Cli::try_parse_from([
        "kanshi",
        "--config",
        "kanshi.json",
        "aggregate",
        "--input",
        "logs.json",
        "--now-ms",
        "1700000060000",
        "--bucket-ms",
        "1000",
        "--format",
        "json-pretty",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("kanshi.json")));
    match cli.command {
        Commands::Aggregate {
            input,
            now_ms,
            window_ms,
            bucket_ms,
            format,
        } => {
            assert_eq!(input, PathBuf::from("logs.json"));
            assert_eq!(now_ms, Some(1_700_000_060_000));
            assert_eq!(window_ms, None);
            assert_eq!(bucket_ms, Some(1000));
            assert_eq!(format, OutputFormat::JsonPretty);
        }
        _ => panic!("Expected Aggregate command"),
    }
}

#[test]
fn test_cli_parsing_classify() {
    let cli = Cli::try_parse_from(["kanshi", "classify", "--payload", "<img src=x onerror=alert(1)>", "--safe-mode"]).unwrap();

    match cli.command {
        Commands::Classify { payload, safe_mode, format } => {
            assert_eq!(payload, "<img src=x onerror=alert(1)>");
            assert!(safe_mode);
            assert_eq!(format, OutputFormat::Text);
        }
        _ => panic!("Expected Classify command"),
    }
}

#[test]
fn test_cli_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["kanshi", "classify", "--payload", "x", "--format", "yaml"]).is_err());
}

#[tokio::test]
async fn test_execute_aggregate_file() {
    let now = 1_700_000_060_000i64;
    let logs = serde_json::json!([
        { "id": "a", "timestamp": now - 1_000, "level": "CRITICAL", "status": "BLOCKED" },
        { "id": "b", "timestamp": now - 2_000, "level": "WARNING", "status": "SUCCESS" },
        { "id": "c", "timestamp": now - 3_000, "level": "INFO", "status": "SUCCESS" },
        { "id": "d", "timestamp": now - 120_000, "level": "UNKNOWN", "status": "BLOCKED" }
    ]);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", logs).unwrap();

    let mut executor = CommandExecutor::new();
    let result = executor
        .execute(Commands::Aggregate {
            input: file.path().to_path_buf(),
            now_ms: Some(now),
            window_ms: None,
            bucket_ms: None,
            format: OutputFormat::Json,
        })
        .await
        .unwrap();

    assert!(result.success);
    let data = result.data.unwrap();
    assert_eq!(data["total_logs"], 4);
    assert_eq!(data["trend"]["labels"].as_array().unwrap().len(), 13);
    assert_eq!(data["levels"]["info"], 2);
    assert_eq!(data["fallback"]["levels"], 1);
    assert_eq!(data["distribution"]["slices"][0]["label"], "BLOCKED: 2 (50.0%)");
}

#[tokio::test]
async fn test_execute_aggregate_rejects_zero_bucket() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[]").unwrap();

    let mut executor = CommandExecutor::new();
    let result = executor
        .execute(Commands::Aggregate {
            input: file.path().to_path_buf(),
            now_ms: Some(0),
            window_ms: None,
            bucket_ms: Some(0),
            format: OutputFormat::Text,
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_execute_aggregate_rejects_oversized_window() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[]").unwrap();

    let mut executor = CommandExecutor::new();
    let result = executor
        .execute(Commands::Aggregate {
            input: file.path().to_path_buf(),
            now_ms: Some(0),
            window_ms: Some(2_000_000),
            bucket_ms: Some(1),
            format: OutputFormat::Text,
        })
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("buckets requested"));
}

#[tokio::test]
async fn test_execute_aggregate_drops_far_future_timestamp() {
    let logs = serde_json::json!([
        { "id": "skewed", "timestamp": i64::MAX, "level": "CRITICAL", "status": "BLOCKED" }
    ]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", logs).unwrap();

    let mut executor = CommandExecutor::new();
    let result = executor
        .execute(Commands::Aggregate {
            input: file.path().to_path_buf(),
            now_ms: Some(30_000),
            window_ms: None,
            bucket_ms: None,
            format: OutputFormat::Json,
        })
        .await
        .unwrap();

    let data = result.data.unwrap();
    assert_eq!(data["dropped"], 1);
    assert_eq!(data["window_start_ms"], -30_000);
    assert_eq!(data["distribution"]["total"], 1);
}

#[tokio::test]
async fn test_execute_classify() {
    let mut executor = CommandExecutor::new();
    let result = executor
        .execute(Commands::Classify {
            payload: "<script>alert('xss')</script>hello".to_string(),
            safe_mode: true,
            format: OutputFormat::Json,
        })
        .await
        .unwrap();

    let data = result.data.unwrap();
    assert_eq!(data["xss_detected"], true);
    assert!(!data["rendered"].as_str().unwrap().contains("<script"));
}

#[tokio::test]
async fn test_execute_simulate_short_run() {
    let mut executor = CommandExecutor::new();
    let result = executor
        .execute(Commands::Simulate {
            duration_secs: 1,
            refresh_ms: Some(100),
            seed: Some(7),
            format: OutputFormat::Json,
        })
        .await
        .unwrap();

    let data = result.data.unwrap();
    assert!(data["produced"].as_u64().unwrap() > 0);
    assert!(data["refreshes"].as_u64().unwrap() > 0);
    assert_eq!(data["produced"], data["total_logs"]);
}
