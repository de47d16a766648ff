// Portal login handler
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::common::parse_json_body;
use crate::proxy::error::BridgeError;
use crate::proxy::server::AppState;

/// POST /api/login
///
/// Relays the portal's body with 200 whatever the portal's status was, so a
/// rejected login is only visible in the body.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    if let Err(e) = parse_json_body(&body) {
        return e.into_response();
    }

    let relayed = match state.portal.forward(body).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "portal login unreachable");
            return BridgeError::BadGateway(e.to_string()).into_response();
        }
    };

    let content_type = relayed
        .content_type
        .unwrap_or_else(|| "application/json".to_string());

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        relayed.body,
    )
        .into_response()
}
