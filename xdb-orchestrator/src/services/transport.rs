//! Dependency Transport
//!
//! Issues call-tool / read-resource requests against the configured
//! dependencies over HTTP. The `ToolTransport` trait is the seam between the
//! adapter and the network; tests substitute a scripted transport.
//!
//! # Error Mapping
//! - Connection refused / DNS failure / non-success HTTP status → `Unavailable`
//! - Client-side deadline exceeded → `Timeout`
//! - Response body not JSON → `Malformed`

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use xdb_common::protocol::{ToolCall, CALL_TOOL_PATH, READ_RESOURCE_PATH};
use xdb_common::{DeploymentMode, OrchestratorConfig};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::types::ServiceOutcome;

/// Connect timeout; the per-call deadline is applied by the adapter
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent header sent to every dependency
const USER_AGENT: &str = concat!("xdb-orchestrator/", env!("CARGO_PKG_VERSION"));

/// Transport-level failure of one dependency request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    /// Capture the failure as outcome data
    pub fn into_outcome<T>(self) -> ServiceOutcome<T> {
        match self {
            TransportError::Unavailable(reason) => ServiceOutcome::Unavailable { reason },
            TransportError::Timeout => ServiceOutcome::Timeout,
            TransportError::Malformed(reason) => ServiceOutcome::Malformed { reason },
        }
    }
}

/// Call-tool / read-resource client for named dependencies
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Invoke a tool on a dependency (single attempt)
    async fn call_tool(&self, service: &str, call: &ToolCall) -> Result<Value, TransportError>;

    /// Read a resource from a dependency (single attempt)
    async fn read_resource(&self, service: &str, uri: &str) -> Result<Value, TransportError>;
}

/// Resolved connection target for one dependency
#[derive(Debug, Clone)]
struct Target {
    base_url: String,
    credential: Option<String>,
}

/// HTTP transport built on reqwest
///
/// Holds no mutable state; the reqwest client pools connections internally.
pub struct HttpTransport {
    http_client: Client,
    targets: BTreeMap<String, Target>,
}

impl HttpTransport {
    /// Build a transport for every service in the configuration
    pub fn from_config(config: &OrchestratorConfig) -> OrchestratorResult<Self> {
        Self::with_mode(config, config.deployment_mode)
    }

    /// Build a transport using an explicit deployment mode
    pub fn with_mode(config: &OrchestratorConfig, mode: DeploymentMode) -> OrchestratorResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let http_client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| OrchestratorError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let targets = config
            .services
            .iter()
            .map(|(name, endpoint)| {
                (
                    name.clone(),
                    Target {
                        base_url: endpoint.base_url(mode).to_string(),
                        credential: endpoint.credential.clone(),
                    },
                )
            })
            .collect();

        Ok(Self { http_client, targets })
    }

    fn target(&self, service: &str) -> Result<&Target, TransportError> {
        self.targets
            .get(service)
            .ok_or_else(|| TransportError::Unavailable(format!("service '{}' is not configured", service)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder, target: &Target) -> reqwest::RequestBuilder {
        match &target.credential {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ToolTransport for HttpTransport {
    async fn call_tool(&self, service: &str, call: &ToolCall) -> Result<Value, TransportError> {
        let target = self.target(service)?;
        let url = format!("{}{}", target.base_url, CALL_TOOL_PATH);
        debug!(service = %service, tool = %call.name, url = %url, "Calling dependency tool");

        let request = self.authorize(self.http_client.post(&url).json(call), target);
        let response = request.send().await.map_err(map_send_error)?;
        decode_body(response).await
    }

    async fn read_resource(&self, service: &str, uri: &str) -> Result<Value, TransportError> {
        let target = self.target(service)?;
        let url = format!("{}{}", target.base_url, READ_RESOURCE_PATH);
        debug!(service = %service, uri = %uri, "Reading dependency resource");

        let request = self.authorize(self.http_client.get(&url).query(&[("uri", uri)]), target);
        let response = request.send().await.map_err(map_send_error)?;
        decode_body(response).await
    }
}

fn map_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Unavailable(format!("connection failed: {}", err))
    } else {
        TransportError::Unavailable(format!("request failed: {}", err))
    }
}

async fn decode_body(response: reqwest::Response) -> Result<Value, TransportError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TransportError::Unavailable(status_reason(status, &body)));
    }

    let bytes = response.bytes().await.map_err(map_send_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TransportError::Malformed(format!("response is not JSON: {}", e)))
}

fn status_reason(status: StatusCode, body: &str) -> String {
    let snippet: String = body.chars().take(200).collect();
    if snippet.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, snippet)
    }
}
