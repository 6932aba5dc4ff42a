//! # Kanshi Aggregate
//!
//! ダッシュボード向けの集計エンジン
//! スライディングウィンドウの時系列バケットとステータス分布を純粋関数で計算
//!
//! Every entry point takes an immutable slice of [`AttackLog`] and, where
//! time matters, a single `now_ms` read by the caller. Nothing here keeps
//! state between calls.
//!
//! ```rust
//! use kanshi_aggregate::{bucketize, tally, WindowConfig};
//! use kanshi_core::{AttackLog, AttackStatus, ThreatLevel};
//!
//! let now = 1_700_000_060_000;
//! let events = vec![AttackLog::new(now, ThreatLevel::Critical, AttackStatus::Blocked)];
//!
//! let window = bucketize(&events, now, &WindowConfig::default());
//! assert_eq!(window.len(), 13);
//! assert_eq!(window.buckets.last().map(|b| b.critical), Some(1));
//!
//! let distribution = tally(&events);
//! assert_eq!(distribution.blocked_percentage(), "100.0");
//! ```
//!
//! [`AttackLog`]: kanshi_core::AttackLog

pub mod config;
pub mod dashboard;
pub mod distribution;
pub mod error;
pub mod fallback;
pub mod labels;
pub mod window;

pub use config::*;
pub use dashboard::*;
pub use distribution::*;
pub use error::*;
pub use fallback::*;
pub use labels::*;
pub use window::*;
