//! Live container stats dashboard.
//!
//! Polls an application's container stats on a fixed interval and renders
//! them in the terminal: a container selector on the left, CPU and
//! memory/swap charts of the selected container on the right.
//!
//! The entry point is [`monitor::run`]. The building blocks are public so
//! the session can be driven against any [`ratatui::backend::Backend`].

pub mod error;
pub mod events;
pub mod monitor;
pub mod poller;
pub mod session;
pub mod ui;

pub use error::TuiError;
pub use monitor::{DEFAULT_POLL_INTERVAL, MonitorConfig, run};
pub use session::{SeriesBuffer, Session, SessionState, Snapshot};
