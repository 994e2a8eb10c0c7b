//! CLI error types.

use appctl_api::ApiError;
use appctl_tui::TuiError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Platform API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Live dashboard failed.
    #[error(transparent)]
    Tui(#[from] TuiError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// No application given and none found in the git configuration.
    #[error(
        "no application given and none detected from git remote '{remote}', \
         use --app NAME or set APPCTL_APP"
    )]
    AppNotDetected {
        /// Remote that was looked up.
        remote: String,
    },

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
