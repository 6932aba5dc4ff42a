//! # Window Bucketizer
//!
//! Trailing time window split into fixed-width buckets anchored to epoch
//! multiples of the bucket width, with per-level counts.

use chrono::{Local, TimeZone};
use kanshi_core::{AttackLog, ThreatLevel};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, trace};

use crate::config::WindowConfig;
use crate::fallback::FallbackHits;
use crate::labels::format_bucket_label;

/// Per-level counts for one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Bucket start, a multiple of the bucket width
    pub start_ms: i64,
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
}

impl Bucket {
    fn empty(start_ms: i64) -> Self {
        Self {
            start_ms,
            critical: 0,
            warning: 0,
            info: 0,
        }
    }

    /// Count one event. Anything but CRITICAL or WARNING lands in `info`.
    fn record(&mut self, level: &ThreatLevel) {
        match level {
            ThreatLevel::Critical => self.critical += 1,
            ThreatLevel::Warning => self.warning += 1,
            _ => self.info += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.critical + self.warning + self.info
    }
}

/// Result of one bucketing pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// The "now" the window was built for
    pub anchor_ms: i64,
    /// Start of the oldest bucket
    pub start_ms: i64,
    pub window_duration_ms: i64,
    pub bucket_width_ms: i64,
    /// Oldest first; the last one may still be filling
    pub buckets: Vec<Bucket>,
    /// `HH:MM:SS` of each bucket start, index-aligned with `buckets`
    pub labels: Vec<String>,
    /// Events whose level was routed to `info`
    pub fallback: FallbackHits,
    /// Events inside the window but with no rendered bucket (future timestamps)
    pub dropped: u64,
}

impl TimeWindow {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bucket owning the given instant, if it is rendered
    pub fn bucket_at(&self, timestamp_ms: i64) -> Option<&Bucket> {
        let offset = timestamp_ms.checked_sub(self.start_ms).filter(|o| *o >= 0)?;
        usize::try_from(offset / self.bucket_width_ms)
            .ok()
            .and_then(|i| self.buckets.get(i))
    }

    /// Events counted across all buckets
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(Bucket::total).sum()
    }

    /// Split into the label sequence and three parallel count series
    pub fn series(&self) -> TrendSeries {
        TrendSeries {
            labels: self.labels.clone(),
            critical: self.buckets.iter().map(|b| b.critical).collect(),
            warning: self.buckets.iter().map(|b| b.warning).collect(),
            info: self.buckets.iter().map(|b| b.info).collect(),
        }
    }
}

/// Chart-ready trend view: labels with index-aligned counts per level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub critical: Vec<u64>,
    pub warning: Vec<u64>,
    pub info: Vec<u64>,
}

/// Bucket `events` into the window ending at `now_ms`, labelled in local time
pub fn bucketize(events: &[AttackLog], now_ms: i64, config: &WindowConfig) -> TimeWindow {
    bucketize_in(events, now_ms, config, &Local)
}

/// Same as [`bucketize`] with labels rendered in `tz`
pub fn bucketize_in<Tz>(events: &[AttackLog], now_ms: i64, config: &WindowConfig, tz: &Tz) -> TimeWindow
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let width = config.bucket_width_ms();
    let start_ms = config.window_start(now_ms);

    let mut buckets = Vec::new();
    let mut labels = Vec::new();
    let mut cursor = Some(start_ms);
    while let Some(bucket_start) = cursor.filter(|t| *t <= now_ms) {
        buckets.push(Bucket::empty(bucket_start));
        labels.push(format_bucket_label(bucket_start, tz));
        cursor = bucket_start.checked_add(width);
    }

    let mut fallback = FallbackHits::default();
    let mut dropped = 0u64;
    let mut stale = 0u64;

    for event in events {
        if event.timestamp < start_ms {
            stale += 1;
            continue;
        }

        // start_ms is bucket aligned, so the offset divides exactly.
        // An offset past i64::MAX is far ahead of any rendered bucket.
        let key = config.bucket_key(event.timestamp);
        let slot = key
            .checked_sub(start_ms)
            .and_then(|offset| usize::try_from(offset / width).ok())
            .and_then(|index| buckets.get_mut(index));

        match slot {
            Some(bucket) => {
                if !event.level.is_recognized() {
                    fallback.levels += 1;
                }
                bucket.record(&event.level);
            }
            None => {
                trace!(id = %event.id, timestamp = event.timestamp, "event outside rendered buckets");
                dropped += 1;
            }
        }
    }

    debug!(
        start_ms,
        now_ms,
        buckets = buckets.len(),
        stale,
        dropped,
        fallback_levels = fallback.levels,
        "bucketized window"
    );

    TimeWindow {
        anchor_ms: now_ms,
        start_ms,
        window_duration_ms: config.window_duration_ms(),
        bucket_width_ms: width,
        buckets,
        labels,
        fallback,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kanshi_core::AttackStatus;

    // 2023-11-14T22:14:20Z, bucket aligned
    const NOW: i64 = 1_700_000_060_000;

    fn log(timestamp: i64, level: ThreatLevel) -> AttackLog {
        AttackLog::new(timestamp, level, AttackStatus::Blocked)
    }

    fn window(events: &[AttackLog], now: i64) -> TimeWindow {
        bucketize_in(events, now, &WindowConfig::default(), &Utc)
    }

    #[test]
    fn test_default_window_has_thirteen_buckets() {
        let w = window(&[], NOW);
        assert_eq!(w.len(), 13);
        assert_eq!(w.labels.len(), 13);
        assert_eq!(w.start_ms, NOW - 60_000);
        assert_eq!(w.buckets.last().unwrap().start_ms, NOW);
    }

    #[test]
    fn test_unaligned_now_keeps_boundaries() {
        let w = window(&[], NOW + 2_500);
        assert_eq!(w.len(), 13);
        assert_eq!(w.start_ms, NOW - 60_000);
        assert!(w.buckets.iter().all(|b| b.start_ms % 5_000 == 0));
    }

    #[test]
    fn test_labels_follow_bucket_starts() {
        let w = window(&[], NOW);
        assert_eq!(w.labels.first().unwrap(), "22:13:20");
        assert_eq!(w.labels[1], "22:13:25");
        assert_eq!(w.labels.last().unwrap(), "22:14:20");
    }

    #[test]
    fn test_counts_by_level() {
        let events = vec![
            log(NOW - 1, ThreatLevel::Critical),
            log(NOW - 2, ThreatLevel::Warning),
            log(NOW - 3, ThreatLevel::Info),
            log(NOW - 4, ThreatLevel::Info),
        ];
        let w = window(&events, NOW);

        let bucket = w.bucket_at(NOW - 1).unwrap();
        assert_eq!(bucket.start_ms, NOW - 5_000);
        assert_eq!((bucket.critical, bucket.warning, bucket.info), (1, 1, 2));
        assert_eq!(w.total(), 4);
    }

    #[test]
    fn test_event_before_window_is_excluded() {
        let events = vec![log(NOW - 60_000 - 1, ThreatLevel::Critical)];
        let w = window(&events, NOW);
        assert_eq!(w.total(), 0);
        assert_eq!(w.dropped, 0);
    }

    #[test]
    fn test_event_at_now_lands_in_final_bucket() {
        let events = vec![log(NOW, ThreatLevel::Warning)];
        let w = window(&events, NOW);
        assert_eq!(w.buckets.last().unwrap().warning, 1);
    }

    #[test]
    fn test_event_at_window_start_lands_in_first_bucket() {
        let events = vec![log(NOW - 60_000, ThreatLevel::Critical)];
        let w = window(&events, NOW);
        assert_eq!(w.buckets[0].critical, 1);
    }

    #[test]
    fn test_future_event_is_dropped() {
        let events = vec![log(NOW + 5_000, ThreatLevel::Critical)];
        let w = window(&events, NOW);
        assert_eq!(w.total(), 0);
        assert_eq!(w.dropped, 1);
    }

    #[test]
    fn test_unrecognized_level_counts_as_info() {
        let events = vec![
            log(NOW, ThreatLevel::from("UNKNOWN")),
            log(NOW, ThreatLevel::missing()),
        ];
        let w = window(&events, NOW);
        let last = w.buckets.last().unwrap();
        assert_eq!(last.info, 2);
        assert_eq!(w.fallback.levels, 2);
    }

    #[test]
    fn test_unsorted_input() {
        let events = vec![
            log(NOW, ThreatLevel::Critical),
            log(NOW - 30_000, ThreatLevel::Critical),
            log(NOW - 59_000, ThreatLevel::Critical),
        ];
        let w = window(&events, NOW);
        assert_eq!(w.buckets[0].critical, 1);
        assert_eq!(w.bucket_at(NOW - 30_000).unwrap().critical, 1);
        assert_eq!(w.buckets[12].critical, 1);
    }

    #[test]
    fn test_series_is_index_aligned() {
        let events = vec![log(NOW, ThreatLevel::Critical), log(NOW, ThreatLevel::Warning)];
        let series = window(&events, NOW).series();
        assert_eq!(series.labels.len(), 13);
        assert_eq!(series.critical.len(), 13);
        assert_eq!(series.critical[12], 1);
        assert_eq!(series.warning[12], 1);
        assert_eq!(series.info.iter().sum::<u64>(), 0);
    }

    #[test]
    fn test_zero_duration_window() {
        let config = WindowConfig::new(0, 5_000).unwrap();
        let w = bucketize_in(&[log(NOW, ThreatLevel::Info)], NOW + 1, &config, &Utc);
        assert_eq!(w.len(), 1);
        assert_eq!(w.buckets[0].info, 1);
    }

    #[test]
    fn test_bucket_at_outside_range() {
        let w = window(&[], NOW);
        assert!(w.bucket_at(NOW - 60_001).is_none());
        assert!(w.bucket_at(NOW + 5_000).is_none());
    }

    #[test]
    fn test_far_future_event_with_negative_window_start() {
        // now is inside the first window, so the window starts before the epoch
        let w = window(&[log(i64::MAX, ThreatLevel::Critical)], 30_000);
        assert_eq!(w.start_ms, -30_000);
        assert_eq!(w.total(), 0);
        assert_eq!(w.dropped, 1);
        assert!(w.bucket_at(i64::MAX).is_none());
    }

    #[test]
    fn test_window_at_minimum_instant() {
        let w = window(&[log(i64::MIN, ThreatLevel::Warning), log(i64::MAX, ThreatLevel::Info)], i64::MIN);
        assert_eq!(w.start_ms, i64::MIN);
        assert_eq!(w.len(), 1);
        assert_eq!(w.buckets[0].warning, 1);
        assert_eq!(w.dropped, 1);
        assert_eq!(w.labels[0], "--:--:--");
    }
}
