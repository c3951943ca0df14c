//! Error types for xdb-orchestrator
//!
//! Dependency failures are never errors here: they are captured as
//! `ServiceOutcome` data. Only caller input errors and orchestration-internal
//! failures surface as `OrchestratorError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use xdb_common::protocol::{ErrorBody, ErrorDetail};

/// Hard failure of an orchestration call
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Caller-supplied arguments fail basic shape checks
    #[error("Invalid input: {0}")]
    ValidationInput(String),

    /// Service name not configured or not usable for the operation
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// Tool name not exposed by this server
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Resource URI not known
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Request cancelled by shutdown
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Orchestration-internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for OrchestratorError {
    fn from(err: serde_json::Error) -> Self {
        OrchestratorError::Internal(format!("serialization failed: {}", err))
    }
}

/// Result type for orchestration calls
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource or tool not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Service shutting down (503)
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::ValidationInput(_) | OrchestratorError::UnknownService(_) => {
                ApiError::BadRequest(err.to_string())
            }
            OrchestratorError::UnknownTool(_) | OrchestratorError::UnknownResource(_) => {
                ApiError::NotFound(err.to_string())
            }
            OrchestratorError::Cancelled(_) => ApiError::Unavailable(err.to_string()),
            OrchestratorError::Internal(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg)
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
