//! # appctl-api
//!
//! Types and HTTP client for the application platform API.
//!
//! Only the container statistics endpoint is covered:
//!
//! ```text
//! GET /v1/apps/{app}/stats  ->  { "stats": [ContainerStat, ...] }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod types;
pub mod units;

pub use client::{ApiClient, StatsSource};
pub use error::ApiError;
pub use types::{AppStats, ContainerStat};
