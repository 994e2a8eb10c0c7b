//! HTTP client for the platform API.
//!
//! [`StatsSource`] is the seam the live monitor polls through; [`ApiClient`]
//! is the real implementation backed by `reqwest`.
//!
//! # Example
//!
//! ```rust,no_run
//! use appctl_api::{ApiClient, StatsSource};
//!
//! # async fn example() -> Result<(), appctl_api::ApiError> {
//! let client = ApiClient::new("https://api.appctl.dev", Some("tk-secret".into()))?;
//! let stats = client.fetch_stats("my-app").await?;
//! println!("containers: {}", stats.stats.len());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use reqwest::{StatusCode, header};
use tracing::{debug, trace};

use crate::error::ApiError;
use crate::types::AppStats;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of container statistics for an application.
///
/// This trait allows for testing with fake implementations.
pub trait StatsSource: Send + Sync {
    /// Fetch the current stats of every container of `app`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn fetch_stats(&self, app: &str) -> impl Future<Output = Result<AppStats, ApiError>> + Send;
}

/// Platform API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not `http://` or `https://`.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, token, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "invalid API URL: {base_url}, must start with http:// or https://"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("appctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn stats_url(&self, app: &str) -> Result<String, ApiError> {
        if app.is_empty() || app.contains('/') {
            return Err(ApiError::Config(format!("invalid application name: {app:?}")));
        }
        Ok(format!("{}/v1/apps/{app}/stats", self.base_url))
    }

    async fn get_stats(&self, app: &str) -> Result<AppStats, ApiError> {
        let url = self.stats_url(app)?;
        debug!(url = %url, "Fetching container stats");

        let mut request = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        trace!(status = status.as_u16(), "Received response");

        match status {
            s if s.is_success() => {
                let body = response.bytes().await?;
                serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ApiError::Unauthorized(error_message(response).await))
            }
            StatusCode::NOT_FOUND => Err(ApiError::AppNotFound(app.to_string())),
            other => Err(ApiError::Status {
                status: other.as_u16(),
                message: error_message(response).await,
            }),
        }
    }
}

impl StatsSource for ApiClient {
    async fn fetch_stats(&self, app: &str) -> Result<AppStats, ApiError> {
        self.get_stats(app).await
    }
}

/// Best-effort extraction of an error message from a failed response.
async fn error_message(response: reqwest::Response) -> String {
    let reason = response
        .status()
        .canonical_reason()
        .unwrap_or("unknown")
        .to_string();

    match response.text().await {
        Ok(body) if !body.trim().is_empty() => serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| body.trim().to_string()),
        _ => reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned HTTP response and hand back the raw request.
    async fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.expect("write");
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}"), handle)
    }

    #[test]
    fn rejects_non_http_url() {
        let err = ApiClient::new("ws://localhost:8080", None).unwrap_err();
        assert!(err.to_string().contains("invalid API URL"));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = ApiClient::new("https://api.example.com/", None).expect("client");
        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(
            client.stats_url("my-app").expect("url"),
            "https://api.example.com/v1/apps/my-app/stats"
        );
    }

    #[test]
    fn rejects_invalid_app_name() {
        let client = ApiClient::new("https://api.example.com", None).expect("client");
        assert!(client.stats_url("").is_err());
        assert!(client.stats_url("a/b").is_err());
    }

    #[test]
    fn debug_hides_token() {
        let client = ApiClient::new("https://api.example.com", Some("secret".into())).expect("client");
        let printed = format!("{client:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("authenticated: true"));
    }

    #[tokio::test]
    async fn fetches_stats_with_bearer_token() {
        let body = r#"{"stats":[{"id":"web-1","cpu_usage":42,"memory_usage":10,"memory_limit":100,"swap_usage":0,"swap_limit":100,"highest_memory_usage":20,"highest_swap_usage":0}]}"#;
        let (url, server) = serve_once("200 OK", body).await;

        let client = ApiClient::new(&url, Some("tk-123".into())).expect("client");
        let stats = client.fetch_stats("my-app").await.expect("stats");

        assert_eq!(stats.stats.len(), 1);
        assert_eq!(stats.stats[0].cpu_usage, 42);

        let request = server.await.expect("server task");
        assert!(request.starts_with("GET /v1/apps/my-app/stats HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer tk-123"));
    }

    #[tokio::test]
    async fn maps_unauthorized() {
        let (url, server) = serve_once("401 Unauthorized", r#"{"error":"invalid token"}"#).await;
        let client = ApiClient::new(&url, None).expect("client");

        let err = client.fetch_stats("my-app").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "invalid token"));
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn maps_not_found() {
        let (url, server) = serve_once("404 Not Found", "").await;
        let client = ApiClient::new(&url, None).expect("client");

        let err = client.fetch_stats("ghost").await.unwrap_err();
        assert!(matches!(err, ApiError::AppNotFound(ref a) if a == "ghost"));
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn maps_server_error() {
        let (url, server) = serve_once("503 Service Unavailable", "maintenance").await;
        let client = ApiClient::new(&url, None).expect("client");

        let err = client.fetch_stats("my-app").await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn maps_garbage_body_to_decode_error() {
        let (url, server) = serve_once("200 OK", "not json").await;
        let client = ApiClient::new(&url, None).expect("client");

        let err = client.fetch_stats("my-app").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        server.await.expect("server task");
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = ApiClient::with_timeout(
            &format!("http://{addr}"),
            None,
            Duration::from_millis(500),
        )
        .expect("client");
        let err = client.fetch_stats("my-app").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
