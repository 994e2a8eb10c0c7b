//! CLI configuration.
//!
//! Values come from, in order of precedence: command-line flags,
//! `APPCTL_*` environment variables (both resolved by clap), the TOML
//! configuration file and built-in defaults.
//!
//! ```toml
//! api_url = "https://api.appctl.dev"
//! api_token = "tk-us-..."
//! git_remote = "appctl"
//! poll_interval_secs = 10
//! request_timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;

/// API used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://api.appctl.dev";

/// Git remote inspected to detect the current application.
pub const DEFAULT_GIT_REMOTE: &str = "appctl";

/// Resolved CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Platform API URL.
    pub api_url: String,
    /// Bearer token for the API.
    pub api_token: Option<String>,
    /// Git remote used for application detection.
    pub git_remote: String,
    /// Seconds between two refreshes of the live dashboard.
    pub poll_interval_secs: u64,
    /// Timeout of a single API request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            git_remote: DEFAULT_GIT_REMOTE.to_string(),
            poll_interval_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CliError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CliError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Default file location, `<config dir>/appctl/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("appctl").join("config.toml"))
    }

    /// Load the file at `path`, or the default file when it exists.
    ///
    /// An explicit path must exist. Without one, a missing default file
    /// yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = path {
            debug!(path = %path.display(), "Loading configuration");
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "Loading configuration");
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Apply values given on the command line or in the environment.
    pub fn with_overrides(
        mut self,
        api_url: Option<String>,
        api_token: Option<String>,
    ) -> Result<Self, CliError> {
        if let Some(api_url) = api_url {
            self.api_url = api_url;
        }
        if let Some(api_token) = api_token {
            self.api_token = Some(api_token);
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.api_url.is_empty() {
            return Err(CliError::Config("api_url cannot be empty".to_string()));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(CliError::Config(
                "api_url must start with http:// or https://".to_string(),
            ));
        }

        if self.git_remote.trim().is_empty() {
            return Err(CliError::Config("git_remote cannot be empty".to_string()));
        }

        if self.poll_interval_secs == 0 {
            return Err(CliError::Config(
                "poll_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Time between two refreshes of the live dashboard.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Timeout of a single API request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
