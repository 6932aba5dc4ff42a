//! Text and JSON rendering of command output

use chrono::Local;
use kanshi_aggregate::{format_bucket_label, DashboardSnapshot};
use kanshi_domain_cyber::PayloadVerdict;
use serde::Serialize;

use crate::commands::OutputFormat;

/// Render `value` as JSON, or with `text` for the text format
pub fn render<T: Serialize>(value: &T, format: &OutputFormat, text: impl FnOnce(&T) -> String) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
    })
}

/// One line per bucket followed by the status distribution
pub fn snapshot_text(snapshot: &DashboardSnapshot) -> String {
    let mut lines = vec![format!(
        "Snapshot at {} ({} logs, {} dropped)",
        format_bucket_label(snapshot.generated_at_ms, &Local),
        snapshot.total_logs,
        snapshot.dropped
    )];

    let trend = &snapshot.trend;
    for (i, label) in trend.labels.iter().enumerate() {
        lines.push(format!(
            "  {}  critical {:>3}  warning {:>3}  info {:>3}",
            label, trend.critical[i], trend.warning[i], trend.info[i]
        ));
    }

    for slice in &snapshot.distribution.slices {
        lines.push(format!("  {}", slice.label));
    }

    if !snapshot.fallback.is_empty() {
        lines.push(format!(
            "  fallback: {} levels counted as INFO, {} statuses counted as PENDING",
            snapshot.fallback.levels, snapshot.fallback.statuses
        ));
    }

    lines.join("\n")
}

/// Classification result with the payload as it would be displayed
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub payload: String,
    pub xss_detected: bool,
    pub matched: Vec<String>,
    pub safe_mode: bool,
    pub rendered: String,
}

impl ClassifyReport {
    pub fn new(payload: &str, verdict: PayloadVerdict, safe_mode: bool, rendered: String) -> Self {
        Self {
            payload: payload.to_string(),
            xss_detected: verdict.xss_detected,
            matched: verdict.matched,
            safe_mode,
            rendered,
        }
    }
}

pub fn classify_text(report: &ClassifyReport) -> String {
    let verdict = if report.xss_detected {
        format!("XSS detected ({})", report.matched.join(", "))
    } else {
        "No XSS detected".to_string()
    };
    let mode = if report.safe_mode { "safe" } else { "raw" };

    format!("{}\nRendered ({}): {}", verdict, mode, report.rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanshi_aggregate::{dashboard_snapshot, WindowConfig};
    use kanshi_core::{AttackLog, AttackStatus, ThreatLevel};

    const NOW: i64 = 1_700_000_060_000;

    #[test]
    fn test_snapshot_text_lists_buckets_and_slices() {
        let events = vec![
            AttackLog::new(NOW - 1_000, ThreatLevel::Critical, AttackStatus::Blocked),
            AttackLog::new(NOW - 2_000, ThreatLevel::from("SEVERE"), AttackStatus::Success),
        ];
        let snapshot = dashboard_snapshot(&events, NOW, &WindowConfig::default());
        let text = snapshot_text(&snapshot);
        let lines: Vec<&str> = text.lines().collect();

        // header + 13 buckets + 3 slices + fallback
        assert_eq!(lines.len(), 18);
        assert!(lines[0].contains("2 logs"));
        assert!(text.contains("BLOCKED: 1 (50.0%)"));
        assert!(text.contains("PENDING: 0 (0.0%)"));
        assert!(lines[17].contains("1 levels counted as INFO"));
    }

    #[test]
    fn test_render_json_formats() {
        let report = ClassifyReport::new(
            "hello",
            PayloadVerdict {
                xss_detected: false,
                matched: vec![],
            },
            true,
            "hello".to_string(),
        );

        let compact = render(&report, &OutputFormat::Json, classify_text).unwrap();
        assert!(!compact.contains('\n'));
        let pretty = render(&report, &OutputFormat::JsonPretty, classify_text).unwrap();
        assert!(pretty.contains('\n'));
        let text = render(&report, &OutputFormat::Text, classify_text).unwrap();
        assert_eq!(text, "No XSS detected\nRendered (safe): hello");
    }
}
