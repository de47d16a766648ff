use jira_bridge::modules;
use jira_bridge::proxy;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = modules::logger::init_logger();

    let config = modules::config::load_bridge_config()?;

    if !config.jira.is_configured() {
        tracing::warn!(
            "Jira credentials not configured; set JIRA_EMAIL and JIRA_API_TOKEN (and optionally JIRA_PROJECT_KEY, JIRA_BASE_URL)"
        );
    }
    tracing::info!(
        base_url = %config.jira.base_url,
        project_key = %config.jira.project_key,
        "starting Jira bridge"
    );

    let bind_address = config.get_bind_address().to_string();
    let port = config.port;
    let state = proxy::AppState::new(config)?;

    let (server, handle) = proxy::AxumServer::start(bind_address.clone(), port, state)
        .await
        .map_err(|e| format!("failed to start bridge server: {}", e))?;

    tracing::info!("jira-bridge listening on http://{}:{}", bind_address, port);

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {}", e))?;

    tracing::info!("shutdown requested, stopping server...");
    server.stop();
    let _ = handle.await;

    Ok(())
}
