//! Response body decoding.
//!
//! Shared by the DoH lookup and the DID Document fetch, so a malformed body is
//! always reported as [`ResolutionError::Json`] regardless of where it came from.

use serde_json::{Map, Value};

use crate::error::ResolutionError;

/// Parses a response body into a JSON object
pub fn decode(body: &[u8]) -> Result<Map<String, Value>, ResolutionError> {
    match serde_json::from_slice(body)? {
        Value::Object(map) => Ok(map),
        other => Err(ResolutionError::Json(format!(
            "expected a JSON object, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
