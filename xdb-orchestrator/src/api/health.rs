//! Health check endpoint
//!
//! Uptime, configured dependencies and cache counters for diagnostics

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::services::CacheStats;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok", or "shutting_down" once shutdown began)
    pub status: String,
    /// Module name ("xdb-orchestrator")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Git commit the binary was built from
    pub git_hash: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Configured dependency services
    pub services: Vec<String>,
    /// Response cache counters (absent when caching is disabled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
    /// Last error message if any (for diagnostics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let last_error = state.last_error.read().await.clone();
    let status = if state.shutdown.is_cancelled() {
        "shutting_down"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status: status.to_string(),
        module: "xdb-orchestrator".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        uptime_seconds,
        services: state.orchestrator.service_names(),
        cache: state.orchestrator.cache_stats().await,
        last_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
