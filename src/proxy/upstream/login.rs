// BIM portal login passthrough

use axum::body::Bytes;
use reqwest::{header, Client};

use super::UpstreamError;

/// Upstream answer, relayed without interpretation.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

pub struct PortalLogin {
    http_client: Client,
    login_url: String,
}

impl PortalLogin {
    pub fn new(http_client: Client, login_url: String) -> Self {
        Self {
            http_client,
            login_url,
        }
    }

    /// POST the caller's JSON body to the portal unchanged.
    ///
    /// Any upstream status is a successful relay; only transport failures
    /// are errors.
    pub async fn forward(&self, body: Bytes) -> Result<RelayedResponse, UpstreamError> {
        let response = self
            .http_client
            .post(&self.login_url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?;

        if status >= 400 {
            tracing::warn!(status, "portal login rejected, relaying upstream body");
        } else {
            tracing::debug!(status, "portal login relayed");
        }

        Ok(RelayedResponse {
            status,
            content_type,
            body,
        })
    }
}
