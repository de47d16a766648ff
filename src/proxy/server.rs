use crate::proxy::config::BridgeConfig;
use crate::proxy::upstream::{build_http_client, JiraClient, PortalLogin};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

const SERVICE_NAME: &str = "Jira Bridge API";

/// Axum application state
///
/// Built once at startup; nothing in it is mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BridgeConfig>,
    pub jira: Arc<JiraClient>,
    pub portal: Arc<PortalLogin>,
}

impl AppState {
    pub fn new(config: BridgeConfig) -> Result<Self, String> {
        let http_client = build_http_client(config.request_timeout)?;
        let jira = JiraClient::new(
            http_client.clone(),
            config.jira.clone(),
            config.bcf_field.clone(),
        );
        let portal = PortalLogin::new(http_client, config.login_url.clone());

        Ok(Self {
            config: Arc::new(config),
            jira: Arc::new(jira),
            portal: Arc::new(portal),
        })
    }
}

/// Build the bridge's routes
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers;

    Router::new()
        .route("/health", get(health_check_handler))
        .route("/api/jira/issue", post(handlers::jira::create_issue))
        .route("/api/jira/config", get(handlers::jira::get_config))
        .route("/api/jira/test", get(handlers::jira::test_permissions))
        .route("/api/login", post(handlers::auth::login))
        .fallback(not_found_handler)
        .layer(crate::proxy::middleware::catch_panic_layer())
        .layer(crate::proxy::middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl AxumServer {
    /// Bind and serve in a background task
    pub async fn start(
        host: String,
        port: u16,
        state: AppState,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), String> {
        let app = build_router(state);

        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind address {}: {}", addr, e))?;

        tracing::info!("Jira bridge started at http://{}", addr);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
        };

        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling ended or error: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Jira bridge stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Stop the server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    Json(json!({
        "status": "OK",
        "service": SERVICE_NAME,
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
    .into_response()
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}
