//! # Distribution Tally
//!
//! Single-pass categorical counts over a whole event collection

use kanshi_core::{AttackLog, AttackStatus, ThreatLevel};
use serde::{Deserialize, Serialize};

use crate::fallback::FallbackHits;
use crate::labels::{format_category_label, format_percentage};

/// Outcome distribution over a collection of events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub blocked: u64,
    pub success: u64,
    /// Includes every status that is neither BLOCKED nor SUCCESS
    pub pending: u64,
    pub total: u64,
    pub fallback: FallbackHits,
}

impl Distribution {
    /// Count for a status; unrecognized statuses share the PENDING counter
    pub fn count(&self, status: &AttackStatus) -> u64 {
        match status {
            AttackStatus::Blocked => self.blocked,
            AttackStatus::Success => self.success,
            _ => self.pending,
        }
    }

    /// Percentage string with one decimal for a status
    pub fn percentage(&self, status: &AttackStatus) -> String {
        format_percentage(self.count(status), self.total)
    }

    pub fn blocked_percentage(&self) -> String {
        format_percentage(self.blocked, self.total)
    }

    pub fn success_percentage(&self) -> String {
        format_percentage(self.success, self.total)
    }

    pub fn pending_percentage(&self) -> String {
        format_percentage(self.pending, self.total)
    }

    /// Chart-ready view ordered BLOCKED, SUCCESS, PENDING
    pub fn view(&self) -> DistributionView {
        let slices = AttackStatus::KNOWN
            .iter()
            .map(|status| {
                let count = self.count(status);
                let percentage = format_percentage(count, self.total);
                DistributionSlice {
                    category: status.to_string(),
                    label: format_category_label(status.as_str(), count, &percentage),
                    count,
                    percentage,
                }
            })
            .collect();

        DistributionView {
            slices,
            total: self.total,
        }
    }
}

/// One category of the distribution view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub category: String,
    pub count: u64,
    pub percentage: String,
    /// `"<CATEGORY>: <count> (<pct>%)"`
    pub label: String,
}

/// Distribution with display strings, ready for a pie/doughnut renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionView {
    pub slices: Vec<DistributionSlice>,
    pub total: u64,
}

impl DistributionView {
    pub fn labels(&self) -> Vec<&str> {
        self.slices.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn counts(&self) -> Vec<u64> {
        self.slices.iter().map(|s| s.count).collect()
    }
}

/// Count `events` by status
pub fn tally(events: &[AttackLog]) -> Distribution {
    let mut distribution = Distribution::default();

    for event in events {
        match &event.status {
            AttackStatus::Blocked => distribution.blocked += 1,
            AttackStatus::Success => distribution.success += 1,
            other => {
                if !other.is_recognized() {
                    distribution.fallback.statuses += 1;
                }
                distribution.pending += 1;
            }
        }
    }

    distribution.total = distribution.blocked + distribution.success + distribution.pending;
    distribution
}

/// Threat level counts over a whole collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub critical: u64,
    pub warning: u64,
    /// Includes every level that is neither CRITICAL nor WARNING
    pub info: u64,
    pub total: u64,
    pub fallback: FallbackHits,
}

/// Count `events` by threat level, with the same fallback as the window
pub fn tally_levels(events: &[AttackLog]) -> LevelCounts {
    let mut counts = LevelCounts::default();

    for event in events {
        match &event.level {
            ThreatLevel::Critical => counts.critical += 1,
            ThreatLevel::Warning => counts.warning += 1,
            other => {
                if !other.is_recognized() {
                    counts.fallback.levels += 1;
                }
                counts.info += 1;
            }
        }
    }

    counts.total = counts.critical + counts.warning + counts.info;
    counts
}
