//! Fallback category accounting
//!
//! Unrecognized levels are counted as INFO and unrecognized statuses as
//! PENDING. The hits are recorded here so producer drift stays visible.

use serde::{Deserialize, Serialize};

/// Number of events routed to a fallback counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackHits {
    /// Levels outside CRITICAL/WARNING/INFO, counted as INFO
    pub levels: u64,
    /// Statuses outside BLOCKED/SUCCESS/PENDING, counted as PENDING
    pub statuses: u64,
}

impl FallbackHits {
    pub fn total(&self) -> u64 {
        self.levels + self.statuses
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn merge(&self, other: &FallbackHits) -> FallbackHits {
        FallbackHits {
            levels: self.levels + other.levels,
            statuses: self.statuses + other.statuses,
        }
    }
}
