// Shared request helpers
use axum::body::Bytes;
use serde_json::Value;

use crate::proxy::error::BridgeError;

const NO_JSON: &str = "No JSON data provided";

/// Parse a request body that must carry JSON data.
///
/// Empty bodies, invalid JSON and falsy values (`null`, `false`, `0`, `""`,
/// empty objects/arrays) all count as "no data".
pub fn parse_json_body(body: &Bytes) -> Result<Value, BridgeError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(BridgeError::InvalidBody(NO_JSON.to_string()));
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting malformed JSON body");
        BridgeError::InvalidBody(NO_JSON.to_string())
    })?;

    let empty = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
    };
    if empty {
        return Err(BridgeError::InvalidBody(NO_JSON.to_string()));
    }

    Ok(value)
}
