//! Error types for platform API calls.

use thiserror::Error;

/// Errors that can occur while talking to the platform API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client was configured with an unusable value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API rejected the credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested application does not exist.
    #[error("application not found: {0}")]
    AppNotFound(String),

    /// Any other non-success HTTP status.
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
