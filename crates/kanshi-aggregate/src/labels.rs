//! Label formatting helpers for the dashboard views

use chrono::{TimeZone, Utc};
use std::fmt::Display;

/// Placeholder for instants chrono cannot represent
const UNREPRESENTABLE_LABEL: &str = "--:--:--";

/// `HH:MM:SS` of an epoch-millisecond instant in the given time zone
pub fn format_bucket_label<Tz>(instant_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match Utc.timestamp_millis_opt(instant_ms).single() {
        Some(utc) => utc.with_timezone(tz).format("%H:%M:%S").to_string(),
        None => UNREPRESENTABLE_LABEL.to_string(),
    }
}

/// Share of `count` in `total` as a percentage with one decimal place,
/// `"0.0"` when `total` is zero.
///
/// The share is computed as `count / total * 100` in `f64` and rounded on
/// that binary value: the nearer tenth wins and an exact tie rounds up.
pub fn format_percentage(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }

    let share = count as f64 / total as f64 * 100.0;
    // a tie at one decimal is k.25 or k.75, exact in binary
    let quarters = share * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        return format!("{:.1}", (share * 10.0).ceil() / 10.0);
    }
    format!("{:.1}", share)
}

/// `"<CATEGORY>: <count> (<pct>%)"`
pub fn format_category_label(category: &str, count: u64, percentage: &str) -> String {
    format!("{}: {} ({}%)", category, count, percentage)
}
