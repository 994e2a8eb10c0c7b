//! Error types for the live dashboard.

use appctl_api::ApiError;
use thiserror::Error;

/// Errors that end a live stats session.
#[derive(Debug, Error)]
pub enum TuiError {
    /// The first fetch failed, nothing to display.
    #[error("initial stats fetch failed: {0}")]
    InitialFetch(#[source] ApiError),

    /// Terminal setup, teardown or input failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    /// Drawing a frame failed.
    #[error("render error: {0}")]
    Render(String),

    /// A background task panicked or was aborted.
    #[error("background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for TuiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}
