//! Call-tool / read-resource wire types
//!
//! The orchestrator exposes the same two operations it consumes from its
//! dependencies:
//! - `POST /call_tool` with body `{"name": ..., "arguments": {...}}`
//! - `GET /read_resource?uri=...`

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path of the invoke-tool operation
pub const CALL_TOOL_PATH: &str = "/call_tool";

/// Path of the read-resource operation
pub const READ_RESOURCE_PATH: &str = "/read_resource";

/// Invoke-tool request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name
    pub name: String,
    /// Tool arguments (a JSON object)
    #[serde(default = "empty_arguments")]
    pub arguments: Value,
}

fn empty_arguments() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Read-resource query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuery {
    pub uri: String,
}

/// Error body returned by the HTTP surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Split a resource URI into `(scheme, rest)`.
///
/// Returns `None` when the URI has no `scheme://` prefix.
pub fn split_uri(uri: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = uri.split_once("://")?;
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return None;
    }
    Some((scheme, rest))
}

/// Unwrap a read-resource response into its JSON document.
///
/// Dependencies answer either with a JSON document directly or with a list
/// of content items whose first `text` field holds serialized JSON.
pub fn unwrap_resource_contents(value: Value) -> Result<Value, String> {
    match value {
        Value::Array(items) => {
            let first = items
                .into_iter()
                .next()
                .ok_or_else(|| "resource response contained no content items".to_string())?;
            match first.get("text").and_then(Value::as_str) {
                Some(text) => serde_json::from_str(text)
                    .map_err(|e| format!("resource text is not JSON: {}", e)),
                None => Ok(first),
            }
        }
        other => Ok(other),
    }
}
