#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use jira_bridge::proxy::{build_router, AppState, BridgeConfig, JiraCredentials};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

const MAX_SIZE: usize = 1024 * 1024;

pub const EMAIL: &str = "bot@acme.test";
pub const API_TOKEN: &str = "t0k3n";
/// base64("bot@acme.test:t0k3n")
pub const BASIC_AUTH: &str = "Basic Ym90QGFjbWUudGVzdDp0MGszbg==";

pub struct TestContext {
    pub mock_server: MockServer,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with(|_| {}).await
    }

    pub async fn unconfigured() -> Self {
        Self::with(|config| {
            config.jira.email.clear();
            config.jira.api_token.clear();
        })
        .await
    }

    /// Bridge pointed at a fresh mock server; `tweak` adjusts the config.
    pub async fn with<F>(tweak: F) -> Self
    where
        F: FnOnce(&mut BridgeConfig),
    {
        let mock_server = MockServer::start().await;
        let mut config = BridgeConfig {
            jira: JiraCredentials {
                base_url: mock_server.uri(),
                email: EMAIL.to_string(),
                api_token: API_TOKEN.to_string(),
                project_key: "CRM".to_string(),
            },
            login_url: format!("{}/auth/login", mock_server.uri()),
            request_timeout: 5,
            ..BridgeConfig::default()
        };
        tweak(&mut config);

        let state = AppState::new(config).expect("app state");
        Self {
            mock_server,
            app: build_router(state),
        }
    }

    pub fn uri(&self) -> String {
        self.mock_server.uri()
    }

    pub async fn outbound_calls(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = self.send_raw(request).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn post_json(&self, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let (status, _, body) = self.post_raw(uri, body).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn post_raw(
        &self,
        uri: &str,
        body: impl Into<Body>,
    ) -> (StatusCode, HeaderMap, Bytes) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap();
        self.send_raw(request).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), MAX_SIZE).await.unwrap();
        (status, headers, body)
    }
}
