//! # Kanshi Streaming
//!
//! Append-only event store, simulated attack stream and periodic dashboard
//! refresher. The aggregation itself lives in `kanshi-aggregate`; this crate
//! only decides when to run it and on which snapshot.

pub mod config;
pub mod error;
pub mod generator;
pub mod refresher;
pub mod session;
pub mod store;
mod task;

pub use config::*;
pub use error::*;
pub use generator::*;
pub use refresher::*;
pub use session::*;
pub use store::*;
