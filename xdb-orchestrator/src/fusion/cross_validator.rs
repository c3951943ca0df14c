//! Cross-Validation Engine
//!
//! Compares interaction lists for one protein set across independent
//! services and separates convergent evidence from single-source claims.
//!
//! # Convergence Rule
//! 1. Normalize both endpoints to canonical gene symbols, drop self-loops
//! 2. Per (pair, service) keep the highest reported confidence
//! 3. A pair is convergent iff ≥2 services report it at or above threshold
//! 4. Validation confidence = mean of the contributing confidences
//!
//! Services that did not answer with `Success` are excluded entirely; they
//! are never read as "reported no edges".

use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::gene_mapper::canonical_symbol;
use super::protein_resolver::check_identifier;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::services::profiles::{profile_for, ServiceProfile};
use crate::services::{ResponseCache, ServiceClient, ToolRequest};
use crate::types::{
    ConvergentEdge, EdgeKey, EvidenceLevel, InteractionEdge, ServiceOutcome, SingleSourceEdge,
    ValidationResult, ValidationSummary,
};

/// Confidence assigned to edges from services that do not score interactions
pub const DEFAULT_UNSCORED_CONFIDENCE: f64 = 0.7;

/// Default convergence threshold
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Minimum distinct services for a meaningful comparison
const MIN_SERVICES: usize = 2;

/// Per-service edge lists keyed by service name
pub type ServiceEdges = BTreeMap<String, ServiceOutcome<Vec<InteractionEdge>>>;

/// Convergent and single-source evidence for a set of service answers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evidence {
    pub convergent: Vec<ConvergentEdge>,
    pub single_source: Vec<SingleSourceEdge>,
    /// Distinct normalized pairs across all answering services
    pub total_edges: usize,
}

/// Cross-database interaction validator
#[derive(Clone)]
pub struct CrossValidator {
    client: Arc<ServiceClient>,
    cache: Option<Arc<ResponseCache>>,
    unscored_confidence: f64,
}

impl CrossValidator {
    pub fn new(client: Arc<ServiceClient>, cache: Option<Arc<ResponseCache>>) -> Self {
        Self {
            client,
            cache,
            unscored_confidence: DEFAULT_UNSCORED_CONFIDENCE,
        }
    }

    /// Override the confidence given to unscored edges
    pub fn with_unscored_confidence(mut self, confidence: f64) -> Self {
        self.unscored_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Fetch interactions among `proteins` from each service and compare them
    pub async fn validate(
        &self,
        proteins: &[String],
        services: &[String],
        threshold: f64,
    ) -> OrchestratorResult<ValidationResult> {
        let proteins = check_proteins(proteins)?;
        check_threshold(threshold)?;
        let targets = self.check_services(services)?;

        let subject = cache_subject(&proteins, threshold);
        let calls = targets.iter().filter_map(|profile| {
            let (tool, arguments) = profile.interaction_call(&proteins, threshold)?;
            let timeouts = self.client.timeouts(profile.name());
            let timeout = if profile.network_heavy() {
                timeouts.network
            } else {
                timeouts.call
            };
            let request = ToolRequest::new(profile.name(), tool, arguments, timeout).cached_as(subject.clone());
            Some(async move {
                let outcome = self
                    .client
                    .call(&request, self.cache.as_deref(), |raw| profile.decode_interactions(raw))
                    .await;
                (profile.name().to_string(), outcome)
            })
        });

        let services: ServiceEdges = join_all(calls).await.into_iter().collect();
        let evidence = compute_evidence(&services, threshold, self.unscored_confidence);

        let answered = services.values().filter(|o| o.is_success()).count();
        let evidence_level = if !evidence.convergent.is_empty() {
            EvidenceLevel::High
        } else if evidence.total_edges > 0 {
            EvidenceLevel::Moderate
        } else {
            EvidenceLevel::None
        };

        let summary = ValidationSummary {
            services_answered: answered,
            services_queried: services.len(),
            total_edges: evidence.total_edges,
            convergent_count: evidence.convergent.len(),
            single_source_count: evidence.single_source.len(),
            evidence_level,
        };

        info!(
            proteins = proteins.len(),
            answered,
            queried = services.len(),
            convergent = summary.convergent_count,
            single_source = summary.single_source_count,
            "Cross-validation complete"
        );

        Ok(ValidationResult {
            proteins,
            services,
            convergent: evidence.convergent,
            single_source: evidence.single_source,
            confidence_threshold: threshold,
            summary,
        })
    }

    fn check_services(&self, services: &[String]) -> OrchestratorResult<Vec<&'static dyn ServiceProfile>> {
        let mut names: Vec<&str> = services.iter().map(|s| s.trim()).collect();
        names.sort_unstable();
        names.dedup();

        if names.len() < MIN_SERVICES {
            return Err(OrchestratorError::ValidationInput(format!(
                "cross-validation needs at least {} distinct services, got {}",
                MIN_SERVICES,
                names.len()
            )));
        }

        names
            .into_iter()
            .map(|name| {
                let profile = profile_for(name)
                    .filter(|_| self.client.is_configured(name))
                    .ok_or_else(|| OrchestratorError::UnknownService(name.to_string()))?;
                if profile.interaction_call(&[], 0.0).is_none() {
                    return Err(OrchestratorError::ValidationInput(format!(
                        "service '{}' provides no interaction data",
                        name
                    )));
                }
                Ok(profile)
            })
            .collect()
    }
}

/// Compare per-service edge lists.
///
/// Deterministic: both output lists are sorted by endpoint pair (then source).
pub fn compute_evidence(services: &ServiceEdges, threshold: f64, unscored_confidence: f64) -> Evidence {
    // pair → service → best confidence
    let mut reports: BTreeMap<EdgeKey, BTreeMap<&str, f64>> = BTreeMap::new();

    for (service, outcome) in services {
        let Some(edges) = outcome.payload() else {
            debug!(service = %service, outcome = outcome.label(), "Excluded from cross-validation");
            continue;
        };
        for edge in edges {
            let key = EdgeKey::new(canonical_symbol(&edge.protein_a), canonical_symbol(&edge.protein_b));
            if key.is_self_loop() {
                continue;
            }
            let confidence = edge.confidence.unwrap_or(unscored_confidence);
            let best = reports.entry(key).or_default().entry(service.as_str()).or_insert(confidence);
            if confidence > *best {
                *best = confidence;
            }
        }
    }

    let mut evidence = Evidence {
        total_edges: reports.len(),
        ..Evidence::default()
    };

    for (key, by_service) in reports {
        let contributors: BTreeMap<String, f64> = by_service
            .iter()
            .filter(|(_, c)| **c >= threshold)
            .map(|(s, c)| (s.to_string(), *c))
            .collect();

        if contributors.len() >= MIN_SERVICES {
            let validation_confidence = contributors.values().sum::<f64>() / contributors.len() as f64;
            evidence.convergent.push(ConvergentEdge {
                proteins: key,
                sources: contributors,
                validation_confidence,
            });
        } else {
            for (service, confidence) in by_service {
                evidence.single_source.push(SingleSourceEdge {
                    proteins: key.clone(),
                    source: service.to_string(),
                    confidence,
                });
            }
        }
    }

    evidence
}

fn check_proteins(proteins: &[String]) -> OrchestratorResult<Vec<String>> {
    if proteins.is_empty() {
        return Err(OrchestratorError::ValidationInput(
            "protein set must not be empty".to_string(),
        ));
    }
    proteins
        .iter()
        .map(|p| check_identifier(p).map(str::to_string))
        .collect()
}

fn check_threshold(threshold: f64) -> OrchestratorResult<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(OrchestratorError::ValidationInput(format!(
            "confidence threshold must be within 0..1, got {}",
            threshold
        )));
    }
    Ok(())
}

/// Order-independent cache subject for a protein set at a threshold
fn cache_subject(proteins: &[String], threshold: f64) -> String {
    let mut sorted: Vec<String> = proteins.iter().map(|p| p.to_uppercase()).collect();
    sorted.sort();
    sorted.dedup();
    format!("{}@{}", sorted.join(","), threshold)
}
