//! CLI command implementations.
//!
//! - [`stats`] - Container resource usage, one-shot or live

pub mod stats;

pub use stats::StatsCommand;
