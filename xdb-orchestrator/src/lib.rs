//! xdb-orchestrator library interface
//!
//! Cross-database protein research orchestration: entity resolution,
//! interaction cross-validation and multi-step workflows over independently
//! operated database services. Exposed for the binary and integration tests.

pub mod api;
pub mod error;
pub mod fusion;
pub mod orchestrator;
pub mod resources;
pub mod services;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use crate::error::{ApiError, ApiResult, OrchestratorError, OrchestratorResult};
pub use crate::orchestrator::Orchestrator;

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Engines, cache and resource catalog
    pub orchestrator: Arc<Orchestrator>,
    /// Cancelled on shutdown; in-flight tool calls observe it
    pub shutdown: CancellationToken,
    /// Superordinate per-request deadline
    pub request_timeout: Duration,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>, request_timeout: Duration) -> Self {
        Self {
            orchestrator,
            shutdown: CancellationToken::new(),
            request_timeout,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Remember a failed request for `/health`
    pub async fn record_error(&self, err: &OrchestratorError) {
        if matches!(err, OrchestratorError::Internal(_)) {
            warn!(error = %err, "Request failed");
        }
        *self.last_error.write().await = Some(err.to_string());
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    Router::new()
        .merge(api::tool_routes())
        .merge(api::resource_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
