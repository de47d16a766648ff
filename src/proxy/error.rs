//! Error types surfaced by the HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Errors a handler answers with before or instead of a structured result.
///
/// Every variant renders as `{"success": false, "error": ...}`.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Jira email or token missing; no outbound call is attempted.
    #[error("Jira credentials not configured. Please set JIRA_EMAIL and JIRA_API_TOKEN environment variables.")]
    NotConfigured,

    /// Missing or malformed request body.
    #[error("{0}")]
    InvalidBody(String),

    /// The portal could not be reached at all.
    #[error("{0}")]
    BadGateway(String),

    /// The permission probe could not complete.
    #[error("Test failed: {0}")]
    ProbeFailed(String),

    /// Anything else. The detail is logged, never returned.
    #[error("Server error")]
    Internal(String),
}

impl BridgeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotConfigured | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::ProbeFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal error while handling request");
        }
        let status = self.status_code();
        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}
