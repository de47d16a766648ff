// Panic 兜底
use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::proxy::error::BridgeError;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Answer a panicking handler with the generic 500 JSON body.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    BridgeError::Internal(format!("handler panicked: {}", detail)).into_response()
}
