//! # appctl-cli
//!
//! Command-line interface of the appctl platform.
//!
//! Provides commands for:
//! - Container resource usage (`appctl stats`), printed once or shown in
//!   a live terminal dashboard with `--stream`
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   GET /v1/apps/{app}/stats   ┌──────────────┐
//! │ appctl-cli │─────────────────────────────►│ platform API │
//! └─────┬──────┘        (appctl-api)          └──────────────┘
//!       │ --stream
//!       ▼
//! ┌────────────┐
//! │ appctl-tui │
//! └────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod detect;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, StatsArgs};
pub use config::Config;
pub use error::CliError;
pub use output::OutputFormat;
