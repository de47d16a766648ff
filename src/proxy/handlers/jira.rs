//! Jira endpoints: issue creation, configuration summary, permission probe.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use super::common::parse_json_body;
use crate::models::IssueRequest;
use crate::proxy::error::BridgeError;
use crate::proxy::server::AppState;

#[derive(Serialize)]
pub struct ConfigSummary {
    pub base_url: String,
    pub project_key: String,
    pub email_configured: bool,
    pub token_configured: bool,
}

/// POST /api/jira/issue
///
/// 200 with the created issue, 400 when Jira is not configured, the body is
/// unusable, or both API versions rejected the issue.
pub async fn create_issue(State(state): State<AppState>, body: Bytes) -> Response {
    if !state.config.jira.is_configured() {
        tracing::warn!("issue creation requested but Jira credentials are not configured");
        return BridgeError::NotConfigured.into_response();
    }

    let value = match parse_json_body(&body) {
        Ok(v) => v,
        Err(e) => return e.into_response(),
    };

    let request: IssueRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return BridgeError::InvalidBody(format!("Invalid issue data: {}", e)).into_response()
        }
    };

    tracing::info!(summary = %request.summary, labels = request.labels.len(), "creating Jira issue");

    let result = state.jira.create_issue(&request).await;
    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(result)).into_response()
}

/// GET /api/jira/config
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigSummary> {
    let jira = &state.config.jira;
    Json(ConfigSummary {
        base_url: jira.base_url.clone(),
        project_key: jira.project_key.clone(),
        email_configured: !jira.email.is_empty(),
        token_configured: !jira.api_token.is_empty(),
    })
}

/// GET /api/jira/test
pub async fn test_permissions(State(state): State<AppState>) -> Response {
    match state.jira.probe_permissions().await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Jira permission probe failed");
            BridgeError::ProbeFailed(e.to_string()).into_response()
        }
    }
}
