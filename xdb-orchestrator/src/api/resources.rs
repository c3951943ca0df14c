//! Resource read endpoint
//!
//! GET /read_resource?uri=<uri>

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use xdb_common::protocol::{ResourceQuery, READ_RESOURCE_PATH};

use crate::error::ApiResult;
use crate::AppState;

/// GET /read_resource
pub async fn read_resource(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> ApiResult<Json<Value>> {
    match state.orchestrator.read_resource(&query.uri).await {
        Ok(document) => Ok(Json(document)),
        Err(e) => {
            state.record_error(&e).await;
            Err(e.into())
        }
    }
}

pub fn resource_routes() -> Router<AppState> {
    Router::new().route(READ_RESOURCE_PATH, get(read_resource))
}
