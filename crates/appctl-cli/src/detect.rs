//! Current application detection.
//!
//! The application is taken from `--app` or `APPCTL_APP` when given.
//! Otherwise the git repository enclosing the working directory is
//! inspected: the URL of the configured remote names the application,
//! e.g. `git@git.appctl.dev:my-app.git` is `my-app`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CliError;

/// Resolve the application to operate on.
///
/// `explicit` is the value of `--app` or `APPCTL_APP`; `start` is the
/// directory the git lookup starts from.
pub fn detect_app(explicit: Option<&str>, start: &Path, remote: &str) -> Result<String, CliError> {
    if let Some(app) = explicit.map(str::trim).filter(|a| !a.is_empty()) {
        return Ok(app.to_string());
    }

    let not_detected = || CliError::AppNotDetected {
        remote: remote.to_string(),
    };

    let config_path = find_git_config(start).ok_or_else(not_detected)?;
    let content = std::fs::read_to_string(&config_path)?;
    let url = remote_url(&content, remote).ok_or_else(not_detected)?;
    let app = app_from_url(&url).ok_or_else(not_detected)?;

    debug!(app = %app, remote, url = %url, "Detected application from git remote");
    Ok(app)
}

/// `.git/config` of the closest repository containing `start`.
fn find_git_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".git").join("config"))
        .find(|path| path.is_file())
}

/// URL of `[remote "<name>"]` in a git config file.
fn remote_url(content: &str, name: &str) -> Option<String> {
    let mut in_remote = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_remote = match header.split_once(char::is_whitespace) {
                Some((section, subsection)) => {
                    section == "remote" && subsection.trim().trim_matches('"') == name
                }
                None => false,
            };
            continue;
        }

        if !in_remote {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim().eq_ignore_ascii_case("url") {
                return Some(value.trim().trim_matches('"').to_string());
            }
        }
    }

    None
}

/// Application name from a remote URL ending in `<app>.git`.
fn app_from_url(url: &str) -> Option<String> {
    let path = url.trim_end_matches('/').strip_suffix(".git")?;
    let app = path.rsplit(['/', ':']).next()?;
    if app.is_empty() {
        return None;
    }
    Some(app.to_string())
}
