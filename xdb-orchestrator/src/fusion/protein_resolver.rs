//! Protein Resolution Engine
//!
//! Fans one identifier out to every target service in parallel and merges
//! the per-service outcomes with the confidence scorer.
//!
//! # Guarantees
//! - Result keys are exactly the (deduplicated) requested services
//! - Result is independent of response arrival order (ordered map)
//! - A dependency failure degrades the status, never the call

use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::confidence_scorer;
use super::gene_mapper;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::services::profiles::{profile_for, ServiceProfile};
use crate::services::{ResponseCache, ServiceClient, ToolRequest};
use crate::types::{ResolutionResult, ServiceOutcome};

/// Resolves protein identifiers across services
#[derive(Clone)]
pub struct ProteinResolver {
    client: Arc<ServiceClient>,
    cache: Option<Arc<ResponseCache>>,
}

impl ProteinResolver {
    pub fn new(client: Arc<ServiceClient>, cache: Option<Arc<ResponseCache>>) -> Self {
        Self { client, cache }
    }

    /// Resolve one identifier against the target services
    pub async fn resolve(&self, identifier: &str, services: &[String]) -> OrchestratorResult<ResolutionResult> {
        let identifier = check_identifier(identifier)?;
        let targets = self.check_services(services)?;
        Ok(self.resolve_checked(identifier, &targets).await)
    }

    /// Resolve several identifiers concurrently; input is checked before any call
    pub async fn resolve_many(
        &self,
        identifiers: &[String],
        services: &[String],
    ) -> OrchestratorResult<Vec<ResolutionResult>> {
        if identifiers.is_empty() {
            return Err(OrchestratorError::ValidationInput(
                "at least one protein identifier is required".to_string(),
            ));
        }
        let identifiers = identifiers
            .iter()
            .map(|id| check_identifier(id))
            .collect::<OrchestratorResult<Vec<_>>>()?;
        let targets = self.check_services(services)?;

        let results = join_all(identifiers.into_iter().map(|id| self.resolve_checked(id, &targets))).await;
        Ok(results)
    }

    async fn resolve_checked(
        &self,
        identifier: &str,
        targets: &[&'static dyn ServiceProfile],
    ) -> ResolutionResult {
        let calls = targets.iter().map(|profile| async move {
            let (tool, arguments) = profile.resolution_call(identifier);
            let timeout = self.client.timeouts(profile.name()).call;
            let request = ToolRequest::new(profile.name(), tool, arguments, timeout).cached_as(identifier);
            let outcome = self
                .client
                .call(&request, self.cache.as_deref(), |raw| profile.decode_resolution(raw))
                .await;
            (profile.name().to_string(), outcome)
        });

        let outcomes: BTreeMap<String, ServiceOutcome> = join_all(calls).await.into_iter().collect();
        let score = confidence_scorer::score(outcomes.values());
        debug!(identifier, outcomes = outcomes.len(), "Resolution outcomes merged");

        let result = ResolutionResult {
            identifier: identifier.to_string(),
            canonical_symbol: gene_mapper::canonical_symbol(identifier),
            aliases: gene_mapper::aliases(identifier),
            outcomes,
            status: score.status,
            confidence: score.value,
        };

        info!(
            identifier = %result.identifier,
            status = ?result.status,
            confidence = result.confidence,
            resolved = result.resolved_services().len(),
            queried = result.outcomes.len(),
            "Protein resolution complete"
        );
        result
    }

    /// Deduplicate and look up the requested services
    fn check_services(&self, services: &[String]) -> OrchestratorResult<Vec<&'static dyn ServiceProfile>> {
        let mut names: Vec<&str> = services.iter().map(|s| s.trim()).collect();
        names.sort_unstable();
        names.dedup();

        if names.is_empty() {
            return Err(OrchestratorError::ValidationInput(
                "at least one target service is required".to_string(),
            ));
        }

        names
            .into_iter()
            .map(|name| match profile_for(name) {
                Some(profile) if self.client.is_configured(name) => Ok(profile),
                _ => Err(OrchestratorError::UnknownService(name.to_string())),
            })
            .collect()
    }
}

/// Non-empty after trimming
pub(crate) fn check_identifier(identifier: &str) -> OrchestratorResult<&str> {
    let trimmed = identifier.trim();
    if trimmed.is_empty() {
        return Err(OrchestratorError::ValidationInput(
            "protein identifier must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
