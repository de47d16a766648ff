// Upstream module - outbound HTTP to Jira and the BIM portal

pub mod client;
pub mod login;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tokio::time::Duration;

pub use client::{JiraClient, API_VERSIONS};
pub use login::{PortalLogin, RelayedResponse};

/// Failure of a single outbound call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Request timed out: {0}")]
    Timeout(reqwest::Error),

    #[error("Request failed: {0}")]
    Transport(reqwest::Error),

    /// Non-success status; `message` is already flattened for display.
    #[error("HTTP {status}: {message}")]
    Rejected {
        status: u16,
        message: String,
        body: Value,
    },

    /// Success status but a body we cannot use.
    #[error("{0}")]
    Malformed(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout(err)
        } else {
            UpstreamError::Transport(err)
        }
    }
}

/// Shared pooled client; `timeout_secs` bounds every call end to end.
pub fn build_http_client(timeout_secs: u64) -> Result<Client, String> {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeout_secs.min(20)))
        .pool_max_idle_per_host(8)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("jira-bridge/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}
