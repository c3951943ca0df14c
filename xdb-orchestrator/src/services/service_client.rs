//! Service Client Adapter
//!
//! Issues exactly one call per request against a named dependency, applies
//! the per-call timeout, optionally routes through the response cache, and
//! decodes the raw JSON into a `ServiceOutcome` at this boundary.
//!
//! No automatic retry: a second attempt against a degraded dependency only
//! adds load. Retrying is the caller's decision.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use xdb_common::protocol::ToolCall;
use xdb_common::OrchestratorConfig;

use super::response_cache::{CacheKey, ResponseCache};
use super::transport::{HttpTransport, ToolTransport, TransportError};
use crate::error::OrchestratorResult;
use crate::types::ServiceOutcome;

/// Per-dependency call deadlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTimeouts {
    /// Ordinary tool calls and resource reads
    pub call: Duration,
    /// Interaction-network calls
    pub network: Duration,
}

impl Default for ServiceTimeouts {
    fn default() -> Self {
        Self {
            call: Duration::from_secs(xdb_common::config::DEFAULT_TIMEOUT_SECS),
            network: Duration::from_secs(xdb_common::config::DEFAULT_NETWORK_TIMEOUT_SECS),
        }
    }
}

/// One outbound tool call
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub service: String,
    pub tool: String,
    pub arguments: Value,
    pub timeout: Duration,
    /// Cache subject; `None` bypasses the cache
    pub cache_subject: Option<String>,
}

impl ToolRequest {
    pub fn new(service: &str, tool: &str, arguments: Value, timeout: Duration) -> Self {
        Self {
            service: service.to_string(),
            tool: tool.to_string(),
            arguments,
            timeout,
            cache_subject: None,
        }
    }

    /// Make the response cacheable under `subject`
    pub fn cached_as(mut self, subject: impl Into<String>) -> Self {
        self.cache_subject = Some(subject.into());
        self
    }
}

/// Adapter over the configured dependencies
pub struct ServiceClient {
    transport: Arc<dyn ToolTransport>,
    services: BTreeMap<String, ServiceTimeouts>,
}

impl ServiceClient {
    /// Create an adapter over an arbitrary transport
    pub fn new(transport: Arc<dyn ToolTransport>, services: BTreeMap<String, ServiceTimeouts>) -> Self {
        Self { transport, services }
    }

    /// Create an HTTP adapter for every configured dependency
    pub fn from_config(config: &OrchestratorConfig) -> OrchestratorResult<Self> {
        let transport = HttpTransport::from_config(config)?;
        let services = config
            .services
            .iter()
            .map(|(name, ep)| {
                (
                    name.clone(),
                    ServiceTimeouts {
                        call: ep.timeout(),
                        network: ep.network_timeout(),
                    },
                )
            })
            .collect();
        Ok(Self::new(Arc::new(transport), services))
    }

    pub fn is_configured(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }

    pub fn service_names(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    /// Deadlines for a service (defaults when not configured)
    pub fn timeouts(&self, service: &str) -> ServiceTimeouts {
        self.services.get(service).copied().unwrap_or_default()
    }

    /// Issue one call and return the raw JSON response
    pub async fn call_raw(
        &self,
        request: &ToolRequest,
        cache: Option<&ResponseCache>,
    ) -> Result<Value, TransportError> {
        if !self.is_configured(&request.service) {
            return Err(TransportError::Unavailable(format!(
                "service '{}' is not configured",
                request.service
            )));
        }

        let fetch = || self.call_with_timeout(request);

        match (cache, &request.cache_subject) {
            (Some(cache), Some(subject)) => {
                let key = CacheKey::new(subject, &request.service, &request.tool);
                // Waiting on another caller's fetch counts against this call's deadline
                match tokio::time::timeout(request.timeout, cache.get_or_fetch(key, fetch)).await {
                    Ok(result) => result,
                    Err(_) => Err(TransportError::Timeout),
                }
            }
            _ => fetch().await,
        }
    }

    /// Issue one call and decode the response into a typed outcome
    pub async fn call<T, D>(
        &self,
        request: &ToolRequest,
        cache: Option<&ResponseCache>,
        decode: D,
    ) -> ServiceOutcome<T>
    where
        D: FnOnce(Value) -> ServiceOutcome<T>,
    {
        let outcome = match self.call_raw(request, cache).await {
            Ok(raw) => decode(raw),
            Err(e) => e.into_outcome(),
        };

        if outcome.is_success() {
            debug!(
                service = %request.service,
                tool = %request.tool,
                confidence = ?outcome.confidence(),
                "Dependency call succeeded"
            );
        } else {
            warn!(
                service = %request.service,
                tool = %request.tool,
                outcome = outcome.label(),
                "Dependency call degraded"
            );
        }
        outcome
    }

    /// Read a resource from a dependency with the service's call deadline
    pub async fn read_resource(&self, service: &str, uri: &str) -> Result<Value, TransportError> {
        if !self.is_configured(service) {
            return Err(TransportError::Unavailable(format!(
                "service '{}' is not configured",
                service
            )));
        }
        let timeout = self.timeouts(service).call;
        match tokio::time::timeout(timeout, self.transport.read_resource(service, uri)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }

    async fn call_with_timeout(&self, request: &ToolRequest) -> Result<Value, TransportError> {
        let call = ToolCall::new(request.tool.clone(), request.arguments.clone());
        match tokio::time::timeout(request.timeout, self.transport.call_tool(&request.service, &call)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(
                    service = %request.service,
                    tool = %request.tool,
                    timeout_ms = request.timeout.as_millis() as u64,
                    "Dependency call deadline exceeded"
                );
                Err(TransportError::Timeout)
            }
        }
    }
}
