// Jira REST client
// Issue creation with API version fallback, and the permission probe

use base64::Engine;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::UpstreamError;
use crate::models::{
    CreatedIssue, IssueFailure, IssueRequest, IssueResult, PermissionProbeResult, ProjectAccess,
    ProjectSummary,
};
use crate::proxy::config::JiraCredentials;
use crate::proxy::mappers::jira::build_issue_payload;

/// REST API revisions tried for issue creation, in order.
pub const API_VERSIONS: [&str; 2] = ["3", "2"];

/// Read-only calls always go to the current revision.
const PROBE_API_VERSION: &str = "3";

#[derive(Deserialize)]
struct CreatedIssueBody {
    key: String,
}

#[derive(Deserialize)]
struct MyPermissionsBody {
    #[serde(default)]
    permissions: Option<Value>,
}

impl MyPermissionsBody {
    /// Missing, `null` or non-object `permissions` relay as an empty map.
    fn into_permissions(self) -> Map<String, Value> {
        match self.permissions {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

pub struct JiraClient {
    http_client: Client,
    credentials: JiraCredentials,
    bcf_field: String,
}

/// `base64(email:api_token)`
pub fn basic_auth_token(email: &str, api_token: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", email, api_token))
}

/// Flatten a Jira error body for display.
///
/// `errorMessages` joined with ", " when present and non-empty, otherwise the
/// whole body as text.
pub fn error_message(body: &Value) -> String {
    let messages: Vec<&str> = body
        .get("errorMessages")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|m| m.as_str()).collect())
        .unwrap_or_default();

    if !messages.is_empty() {
        return messages.join(", ");
    }

    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl JiraClient {
    pub fn new(http_client: Client, credentials: JiraCredentials, bcf_field: String) -> Self {
        Self {
            http_client,
            credentials,
            bcf_field,
        }
    }

    fn headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let token = basic_auth_token(&self.credentials.email, &self.credentials.api_token);
        // base64 output is always a valid header value
        if let Ok(value) = header::HeaderValue::from_str(&format!("Basic {}", token)) {
            headers.insert(header::AUTHORIZATION, value);
        }
        headers
    }

    /// Create an issue, trying API v3 first and v2 second.
    ///
    /// Each version is attempted at most once. When both fail, the error of
    /// the last attempt is reported.
    pub async fn create_issue(&self, request: &IssueRequest) -> IssueResult {
        let payload = build_issue_payload(&self.credentials.project_key, &self.bcf_field, request);
        let mut last_err: Option<UpstreamError> = None;

        for version in API_VERSIONS {
            match self.post_issue(version, &payload).await {
                Ok(issue_key) => {
                    let issue_url = self.credentials.issue_url(&issue_key);
                    tracing::info!(
                        api_version = version,
                        issue_key = %issue_key,
                        "Jira issue created"
                    );
                    return IssueResult::Success(CreatedIssue {
                        issue_key,
                        issue_url,
                        api_version_used: version.to_string(),
                    });
                }
                Err(err @ UpstreamError::Malformed(_)) => {
                    // The issue may already exist upstream, so no fallback.
                    tracing::error!(api_version = version, error = %err, "unusable create-issue response");
                    return IssueResult::failure(err.to_string());
                }
                Err(err) => {
                    tracing::warn!(api_version = version, error = %err, "Jira API call failed");
                    last_err = Some(err);
                }
            }
        }

        IssueResult::Failure(match last_err {
            Some(UpstreamError::Rejected {
                status,
                message,
                body,
            }) => IssueFailure {
                error_message: message,
                status: Some(status),
                details: Some(body),
            },
            Some(other) => IssueFailure {
                error_message: other.to_string(),
                status: None,
                details: None,
            },
            None => IssueFailure {
                error_message: "All API versions failed".to_string(),
                status: None,
                details: None,
            },
        })
    }

    async fn post_issue(&self, version: &str, payload: &Value) -> Result<String, UpstreamError> {
        let url = self.credentials.rest_url(version, "issue");
        tracing::debug!(api_version = version, url = %url, "Trying Jira API");

        let response = self
            .http_client
            .post(&url)
            .headers(self.headers())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(api_version = version, status = status.as_u16(), "Jira responded");

        if status == StatusCode::OK || status == StatusCode::CREATED {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| UpstreamError::Malformed(format!("Failed to read Jira response: {}", e)))?;
            let created: CreatedIssueBody = serde_json::from_slice(&bytes).map_err(|_| {
                UpstreamError::Malformed("Jira response did not contain an issue key".to_string())
            })?;
            return Ok(created.key);
        }

        Err(rejection(response).await)
    }

    async fn get(&self, url: &str) -> Result<Response, UpstreamError> {
        let response = self
            .http_client
            .get(url)
            .headers(self.headers())
            .send()
            .await?;
        Ok(response)
    }

    /// Check project access, visible projects and the account's permissions.
    ///
    /// The three calls run concurrently and are evaluated independently. A
    /// transport failure or an unreadable 200 body fails the whole probe.
    pub async fn probe_permissions(&self) -> Result<PermissionProbeResult, UpstreamError> {
        let creds = &self.credentials;
        let project_url = creds.rest_url(
            PROBE_API_VERSION,
            &format!("project/{}", creds.project_key),
        );
        let projects_url = creds.rest_url(PROBE_API_VERSION, "project");
        let permissions_url = creds.rest_url(PROBE_API_VERSION, "mypermissions");

        let (project, projects, permissions) = tokio::join!(
            self.get(&project_url),
            self.get(&projects_url),
            self.get(&permissions_url)
        );
        let (project, projects, permissions) = (project?, projects?, permissions?);

        let project_status = project.status();

        let available_projects = if projects.status() == StatusCode::OK {
            projects
                .json::<Vec<ProjectSummary>>()
                .await
                .map_err(|e| UpstreamError::Malformed(format!("Invalid project list: {}", e)))?
        } else {
            tracing::warn!(status = projects.status().as_u16(), "project list unavailable");
            Vec::new()
        };

        let permissions = if permissions.status() == StatusCode::OK {
            permissions
                .json::<MyPermissionsBody>()
                .await
                .map_err(|e| UpstreamError::Malformed(format!("Invalid permissions: {}", e)))?
                .into_permissions()
        } else {
            tracing::warn!(status = permissions.status().as_u16(), "permission list unavailable");
            Map::new()
        };

        tracing::info!(
            project_status = project_status.as_u16(),
            projects = available_projects.len(),
            permissions = permissions.len(),
            "Jira permission probe finished"
        );

        Ok(PermissionProbeResult {
            project_access: ProjectAccess {
                status: project_status.as_u16(),
                accessible: project_status == StatusCode::OK,
            },
            available_projects,
            permissions,
        })
    }
}

/// Turn a non-success response into `Rejected`, keeping the raw body.
async fn rejection(response: Response) -> UpstreamError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    let body = if text.trim().is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    UpstreamError::Rejected {
        status,
        message: error_message(&body),
        body,
    }
}
