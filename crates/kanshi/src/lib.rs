//! # Kanshi - Security Attack Log Dashboard Stack
//!
//! Kanshi turns a stream of intrusion-detection records into the two views a
//! security dashboard shows: a bucketed severity trend over a trailing window
//! and a cumulative distribution of attack outcomes.
//!
//! ## Quick Start
//!
//! ```rust
//! use kanshi::prelude::*;
//!
//! let now = 1_700_000_060_000;
//! let logs = vec![
//!     AttackLog::new(now - 1_000, ThreatLevel::Critical, AttackStatus::Blocked),
//!     AttackLog::new(now - 7_000, ThreatLevel::Warning, AttackStatus::Success),
//! ];
//!
//! let window = bucketize(&logs, now, &WindowConfig::default());
//! assert_eq!(window.len(), 13);
//!
//! let distribution = tally(&logs);
//! assert_eq!(distribution.blocked_percentage(), "50.0");
//! ```
//!
//! ## Architecture
//!
//! - **`kanshi-core`**: attack log model, category parsing, clocks
//! - **`kanshi-aggregate`**: window bucketizer and distribution tally
//! - **`kanshi-domain-cyber`**: XSS payload classification and sanitizing
//! - **`kanshi-streaming`**: event store, simulated stream, dashboard refresher
//! - **`kanshi-observability`**: health and metrics routes
//! - **`kanshi-api`**: RESTful web API
//! - **`kanshi-cli`**: command-line interface
//!
//! ## Feature Flags
//!
//! - `full` (default): All crates included
//! - `core`: Only the data model
//! - `aggregate`: Pure aggregation views
//! - `cyber`: Payload classification
//! - `streaming`: Store, stream session and refresher
//! - `api`: REST API server
//! - `cli`: Command-line tools

#[cfg(feature = "kanshi-core")]
pub use kanshi_core as core;

#[cfg(feature = "kanshi-aggregate")]
pub use kanshi_aggregate as aggregate;

#[cfg(feature = "kanshi-domain-cyber")]
pub use kanshi_domain_cyber as domain_cyber;

#[cfg(feature = "kanshi-streaming")]
pub use kanshi_streaming as streaming;

#[cfg(feature = "kanshi-observability")]
pub use kanshi_observability as observability;

#[cfg(feature = "kanshi-api")]
pub use kanshi_api as api;

#[cfg(feature = "kanshi-cli")]
pub use kanshi_cli as cli;

// Convenience re-exports for common types (feature-gated)
#[cfg(feature = "kanshi-core")]
pub use kanshi_core::{AttackLog, AttackStatus, Clock, ManualClock, SystemClock, ThreatLevel};

#[cfg(feature = "kanshi-aggregate")]
pub use kanshi_aggregate::{bucketize, dashboard_snapshot, tally, tally_levels, DashboardSnapshot, WindowConfig};

#[cfg(feature = "kanshi-domain-cyber")]
pub use kanshi_domain_cyber::PayloadClassifier;

#[cfg(feature = "kanshi-streaming")]
pub use kanshi_streaming::{DashboardRefresher, EventGenerator, EventStore, StreamSession, StreamingConfig};

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;
pub use tokio;

/// Prelude module for convenient imports
///
/// ```rust
/// use kanshi::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "kanshi-core")]
    pub use kanshi_core::{AttackLog, AttackStatus, Clock, ManualClock, SystemClock, ThreatLevel};

    #[cfg(feature = "kanshi-aggregate")]
    pub use kanshi_aggregate::{
        bucketize, dashboard_snapshot, tally, tally_levels, DashboardSnapshot, Distribution, TimeWindow,
        WindowConfig,
    };

    #[cfg(feature = "kanshi-domain-cyber")]
    pub use kanshi_domain_cyber::PayloadClassifier;

    #[cfg(feature = "kanshi-streaming")]
    pub use kanshi_streaming::{DashboardRefresher, EventGenerator, EventStore, StreamSession, StreamingConfig};

    // Common external types
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
}

/// Current version of Kanshi
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Basic information to verify the stack is wired correctly
pub fn health_check() -> serde_json::Value {
    serde_json::json!({
        "status": "healthy",
        "version": VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "modules": {
            "core": cfg!(feature = "kanshi-core"),
            "aggregate": cfg!(feature = "kanshi-aggregate"),
            "domain_cyber": cfg!(feature = "kanshi-domain-cyber"),
            "streaming": cfg!(feature = "kanshi-streaming"),
            "observability": cfg!(feature = "kanshi-observability"),
            "api": cfg!(feature = "kanshi-api"),
            "cli": cfg!(feature = "kanshi-cli")
        }
    })
}
