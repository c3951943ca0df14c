//! Dopaminergic Reference Network
//!
//! Cross-validates the curated dopaminergic protein set for a discovery mode
//! and summarizes how confident the resulting edges are.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

use super::CrossValidator;
use crate::error::OrchestratorResult;
use crate::resources::curated::{self, DiscoveryMode};
use crate::types::ValidationResult;

/// Threshold applied when the caller gives none
pub const DEFAULT_NETWORK_THRESHOLD: f64 = 0.7;

/// Edges strictly above this are high confidence
const HIGH_CONFIDENCE: f64 = 0.8;
/// Edges below this are low confidence
const LOW_CONFIDENCE: f64 = 0.4;

/// Spread of edge confidences in a network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceDistribution {
    pub total_interactions: usize,
    pub highest_confidence: Option<f64>,
    pub lowest_confidence: Option<f64>,
    pub median_confidence: Option<f64>,
    pub high_confidence_count: usize,
    pub medium_confidence_count: usize,
    pub low_confidence_count: usize,
}

impl ConfidenceDistribution {
    /// Convergent edges count with their validation confidence
    pub fn of(validation: &ValidationResult) -> Self {
        let mut scores: Vec<f64> = validation
            .convergent
            .iter()
            .map(|edge| edge.validation_confidence)
            .chain(validation.single_source.iter().map(|edge| edge.confidence))
            .collect();
        scores.sort_by(|a, b| b.total_cmp(a));

        Self {
            total_interactions: scores.len(),
            highest_confidence: scores.first().copied(),
            lowest_confidence: scores.last().copied(),
            median_confidence: scores.get(scores.len() / 2).copied(),
            high_confidence_count: scores.iter().filter(|s| **s > HIGH_CONFIDENCE).count(),
            medium_confidence_count: scores
                .iter()
                .filter(|s| (LOW_CONFIDENCE..=HIGH_CONFIDENCE).contains(*s))
                .count(),
            low_confidence_count: scores.iter().filter(|s| **s < LOW_CONFIDENCE).count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceNetwork {
    pub discovery_mode: DiscoveryMode,
    pub include_indirect: bool,
    pub core_proteins: Vec<String>,
    pub total_core_proteins: usize,
    /// Edge endpoints outside the core set
    pub discovered_proteins: Vec<String>,
    pub confidence_distribution: ConfidenceDistribution,
    pub validation: ValidationResult,
}

/// Cross-validate the reference set for `mode` over `services`
pub async fn build(
    validator: &CrossValidator,
    mode: DiscoveryMode,
    include_indirect: bool,
    services: &[String],
    threshold: f64,
) -> OrchestratorResult<ReferenceNetwork> {
    let core_proteins: Vec<String> = curated::dopaminergic_proteins(mode, include_indirect)
        .into_iter()
        .map(str::to_string)
        .collect();

    let validation = validator.validate(&core_proteins, services, threshold).await?;
    let confidence_distribution = ConfidenceDistribution::of(&validation);

    let core: BTreeSet<&str> = core_proteins.iter().map(String::as_str).collect();
    let discovered_proteins: Vec<String> = validation
        .convergent
        .iter()
        .map(|edge| &edge.proteins)
        .chain(validation.single_source.iter().map(|edge| &edge.proteins))
        .flat_map(|key| [key.0.as_str(), key.1.as_str()])
        .filter(|protein| !core.contains(protein))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    info!(
        mode = ?mode,
        core = core_proteins.len(),
        edges = confidence_distribution.total_interactions,
        discovered = discovered_proteins.len(),
        "Reference network built"
    );

    Ok(ReferenceNetwork {
        discovery_mode: mode,
        include_indirect,
        total_core_proteins: core_proteins.len(),
        core_proteins,
        discovered_proteins,
        confidence_distribution,
        validation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ServiceClient, ServiceTimeouts};
    use crate::test_support::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn validator(transport: ScriptedTransport) -> CrossValidator {
        let services = ["string", "biogrid"]
            .into_iter()
            .map(|name| (name.to_string(), ServiceTimeouts::default()))
            .collect();
        CrossValidator::new(Arc::new(ServiceClient::new(Arc::new(transport), services)), None)
    }

    fn services() -> Vec<String> {
        vec!["string".to_string(), "biogrid".to_string()]
    }

    fn network_transport() -> ScriptedTransport {
        ScriptedTransport::new()
            .respond(
                "string",
                "get_network",
                json!({"network_data": [
                    {"preferredName_A": "TH", "preferredName_B": "DDC", "score": 0.95},
                    {"preferredName_A": "TH", "preferredName_B": "SLC6A3", "score": 0.78},
                    {"preferredName_A": "DRD2", "preferredName_B": "GNAI1", "score": 0.72}
                ]}),
            )
            .respond(
                "biogrid",
                "search_interactions",
                json!({"1": {"OFFICIAL_SYMBOL_A": "DDC", "OFFICIAL_SYMBOL_B": "TH"}}),
            )
    }

    #[tokio::test]
    async fn test_minimal_network() {
        let network = build(&validator(network_transport()), DiscoveryMode::Minimal, false, &services(), 0.7)
            .await
            .unwrap();

        assert_eq!(network.core_proteins, vec!["TH", "DDC", "SLC6A3", "DRD2"]);
        assert_eq!(network.total_core_proteins, 4);
        assert_eq!(network.validation.summary.convergent_count, 1);
        assert_eq!(network.discovered_proteins, vec!["GNAI1"]);

        let dist = &network.confidence_distribution;
        assert_eq!(dist.total_interactions, 3);
        assert_eq!(dist.medium_confidence_count, 2);
        assert_eq!(dist.lowest_confidence, Some(0.72));
    }

    #[tokio::test]
    async fn test_network_with_no_edges() {
        let network = build(&validator(ScriptedTransport::new()), DiscoveryMode::HypothesisFree, true, &services(), 0.7)
            .await
            .unwrap();

        assert_eq!(network.core_proteins, vec!["TH", "SLC6A3", "DRD2", "SNCA", "PRKN"]);
        assert_eq!(network.confidence_distribution.total_interactions, 0);
        assert_eq!(network.confidence_distribution.median_confidence, None);
        assert!(network.discovered_proteins.is_empty());
    }

    #[tokio::test]
    async fn test_threshold_out_of_range() {
        let result = build(&validator(ScriptedTransport::new()), DiscoveryMode::Minimal, false, &services(), 70.0).await;
        assert!(result.is_err());
    }
}
