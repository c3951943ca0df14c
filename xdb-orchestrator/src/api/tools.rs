//! Tool invocation endpoint
//!
//! POST /call_tool with `{"name": ..., "arguments": {...}}`

use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;
use xdb_common::protocol::{ToolCall, CALL_TOOL_PATH};

use crate::error::ApiResult;
use crate::AppState;

/// POST /call_tool
///
/// Returns the tool's result document. Dependency failures are reported
/// inside the document; only input errors and unknown tools are HTTP errors.
pub async fn call_tool(State(state): State<AppState>, Json(call): Json<ToolCall>) -> ApiResult<Json<Value>> {
    match state
        .orchestrator
        .invoke_tool(&call.name, call.arguments, &state.shutdown)
        .await
    {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            state.record_error(&e).await;
            Err(e.into())
        }
    }
}

pub fn tool_routes() -> Router<AppState> {
    Router::new().route(CALL_TOOL_PATH, post(call_tool))
}
