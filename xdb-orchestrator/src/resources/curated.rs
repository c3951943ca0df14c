//! Curated static content: biomarker candidate sets, the Parkinson's disease
//! research overview skeleton, workflow templates and the dopaminergic
//! reference protein sets.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{OrchestratorError, OrchestratorResult};

/// Diseases with curated candidate sets
pub const DISEASES: &[&str] = &["parkinson"];

/// Verified PRIDE datasets used when the live listing cannot be fetched
pub const FALLBACK_PRIDE_DATASETS: &[&str] = &[
    "PXD015293", // mouse models
    "PXD037684", // human substantia nigra
    "PXD047134", // GBA1 mutation study
    "PXD030142", // single-cell study
    "PXD020722", // urinary biomarkers
];

/// Curated candidate tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateTier {
    High,
    Moderate,
}

impl CandidateTier {
    pub fn parse(value: &str) -> OrchestratorResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" => Ok(CandidateTier::High),
            "moderate" => Ok(CandidateTier::Moderate),
            other => Err(OrchestratorError::ValidationInput(format!(
                "unknown confidence level '{}' (expected high or moderate)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateTier::High => "high",
            CandidateTier::Moderate => "moderate",
        }
    }
}

/// One curated biomarker candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiomarkerCandidate {
    pub protein: &'static str,
    pub confidence: f64,
    pub evidence: &'static str,
}

const PD_HIGH: &[BiomarkerCandidate] = &[
    BiomarkerCandidate { protein: "SNCA", confidence: 0.95, evidence: "genetic" },
    BiomarkerCandidate { protein: "PARK2", confidence: 0.92, evidence: "proteomic" },
    BiomarkerCandidate { protein: "TH", confidence: 0.88, evidence: "functional" },
];

const PD_MODERATE: &[BiomarkerCandidate] = &[
    BiomarkerCandidate { protein: "LRRK2", confidence: 0.85, evidence: "genetic" },
    BiomarkerCandidate { protein: "PINK1", confidence: 0.82, evidence: "functional" },
    BiomarkerCandidate { protein: "COMT", confidence: 0.78, evidence: "expression" },
    BiomarkerCandidate { protein: "UCHL1", confidence: 0.75, evidence: "genetic" },
];

/// Curated candidates for a disease at a tier
pub fn biomarker_candidates(disease: &str, tier: CandidateTier) -> OrchestratorResult<&'static [BiomarkerCandidate]> {
    match (disease.trim().to_lowercase().as_str(), tier) {
        ("parkinson", CandidateTier::High) => Ok(PD_HIGH),
        ("parkinson", CandidateTier::Moderate) => Ok(PD_MODERATE),
        (other, _) => Err(OrchestratorError::ValidationInput(format!(
            "no curated candidates for '{}' (available: {})",
            other,
            DISEASES.join(", ")
        ))),
    }
}

/// Candidate set as a response document
pub fn candidates_document(disease: &str, tier: CandidateTier) -> OrchestratorResult<Value> {
    let candidates = biomarker_candidates(disease, tier)?;
    Ok(json!({
        "disease": disease.trim().to_lowercase(),
        "confidence_level": tier.as_str(),
        "candidates": candidates,
        "total_candidates": candidates.len(),
    }))
}

/// Research overview before live enrichment
pub fn research_overview() -> Value {
    json!({
        "biomarkers": {
            "established": ["SNCA", "PARK2", "TH", "DRD2"],
            "emerging": ["LRRK2", "PINK1", "COMT", "UCHL1"],
            "total_count": 8,
        },
        "datasets": {
            "pride_proteomics": [],
            "string_networks": ["string://markers/dopaminergic"],
            "total_datasets": 0,
        },
        "research_workflows": [
            "workflow://pd-biomarker-discovery",
            "workflow://cross-database-validation",
        ],
        "key_pathways": [
            "Dopamine synthesis",
            "Mitochondrial function",
            "Protein aggregation",
            "Neuroinflammation",
            "Autophagy/mitophagy",
        ],
        "database_coverage": {
            "STRING": "protein interactions",
            "PRIDE": "proteomics datasets",
            "BioGRID": "validated interactions",
        },
        "note": "For individual protein resolution, use the resolve_protein_entity tool",
    })
}

/// Workflow template by URI path (`workflow://<name>`)
pub fn workflow_template(name: &str) -> Option<Value> {
    match name {
        "pd-biomarker-discovery" => Some(json!({
            "name": "PD Biomarker Discovery Workflow",
            "description": "Identify and validate PD biomarkers with cross-database integration",
            "steps": [
                {
                    "step": 1,
                    "name": "Get research overview",
                    "resources": ["research://parkinson/overview"],
                    "description": "Review established and emerging biomarkers, available datasets",
                },
                {
                    "step": 2,
                    "name": "Resolve target proteins",
                    "tools": ["resolve_protein_entity"],
                    "output": "cross-database mappings with confidence",
                },
                {
                    "step": 3,
                    "name": "Cross-validate interactions",
                    "tools": ["cross_validate_interactions"],
                    "output": "interaction network with validation confidence",
                },
                {
                    "step": 4,
                    "name": "Execute comprehensive workflow",
                    "tools": ["execute_workflow"],
                    "output": "validated biomarker candidates with recommendations",
                },
                {
                    "step": 5,
                    "name": "Get additional candidates",
                    "tools": ["get_biomarker_candidates"],
                    "output": "ranked candidate list",
                },
            ],
            "confidence_thresholds": {
                "minimum_databases": 2,
                "minimum_confidence": 0.7,
                "minimum_interactions": 5,
            },
        })),
        "cross-database-validation" => Some(json!({
            "name": "Cross-Database Validation Workflow",
            "description": "Find interactions reported independently by STRING and BioGRID",
            "steps": [
                {
                    "step": 1,
                    "name": "Cross-validate interactions",
                    "tools": ["cross_validate_interactions"],
                    "output": "convergent and single-source interactions",
                },
            ],
            "confidence_thresholds": {
                "minimum_databases": 2,
                "minimum_confidence": 0.4,
            },
        })),
        _ => None,
    }
}

/// Breadth of the dopaminergic reference protein set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    Minimal,
    Standard,
    Comprehensive,
    HypothesisFree,
}

pub const DISCOVERY_MODES: &[&str] = &["minimal", "standard", "comprehensive", "hypothesis_free"];

impl DiscoveryMode {
    pub fn parse(value: &str) -> OrchestratorResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "minimal" => Ok(DiscoveryMode::Minimal),
            "standard" => Ok(DiscoveryMode::Standard),
            "comprehensive" => Ok(DiscoveryMode::Comprehensive),
            "hypothesis_free" => Ok(DiscoveryMode::HypothesisFree),
            other => Err(OrchestratorError::ValidationInput(format!(
                "unknown discovery mode '{}' (expected one of: {})",
                other,
                DISCOVERY_MODES.join(", ")
            ))),
        }
    }
}

const DA_SYNTHESIS: &[&str] = &["TH", "DDC"];
const DA_TRANSPORT: &[&str] = &["SLC6A3", "SLC18A2"];
const DA_RECEPTORS: &[&str] = &["DRD1", "DRD2", "DRD3", "DRD4", "DRD5"];
const DA_METABOLISM: &[&str] = &["COMT", "MAOA", "MAOB"];
/// PD-associated proteins acting on dopaminergic neurons indirectly
const DA_INDIRECT: &[&str] = &["SNCA", "PRKN", "LRRK2", "PINK1"];

/// Canonical symbols of the dopaminergic reference set for a mode.
///
/// `include_indirect` adds PD-associated proteins in the comprehensive and
/// hypothesis-free modes only.
pub fn dopaminergic_proteins(mode: DiscoveryMode, include_indirect: bool) -> Vec<&'static str> {
    let mut proteins: Vec<&'static str> = match mode {
        DiscoveryMode::Minimal => [DA_SYNTHESIS, &["SLC6A3", "DRD2"][..]].concat(),
        DiscoveryMode::Standard => [DA_SYNTHESIS, DA_TRANSPORT, &DA_RECEPTORS[..2], &DA_METABOLISM[..1]].concat(),
        DiscoveryMode::Comprehensive => [DA_SYNTHESIS, DA_TRANSPORT, DA_RECEPTORS, DA_METABOLISM].concat(),
        DiscoveryMode::HypothesisFree => vec!["TH", "SLC6A3", "DRD2"],
    };

    if include_indirect {
        match mode {
            DiscoveryMode::Comprehensive => proteins.extend_from_slice(DA_INDIRECT),
            DiscoveryMode::HypothesisFree => proteins.extend_from_slice(&DA_INDIRECT[..2]),
            DiscoveryMode::Minimal | DiscoveryMode::Standard => {}
        }
    }
    proteins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_tiers() {
        let high = biomarker_candidates("parkinson", CandidateTier::High).unwrap();
        assert_eq!(high.iter().map(|c| c.protein).collect::<Vec<_>>(), vec!["SNCA", "PARK2", "TH"]);

        let moderate = biomarker_candidates("Parkinson", CandidateTier::Moderate).unwrap();
        assert_eq!(moderate.len(), 4);
        assert!(moderate.iter().all(|c| !c.evidence.is_empty()));
    }

    #[test]
    fn test_unknown_disease_or_tier() {
        assert!(biomarker_candidates("alzheimer", CandidateTier::High).is_err());
        assert!(CandidateTier::parse("low").is_err());
        assert_eq!(CandidateTier::parse(" HIGH ").unwrap(), CandidateTier::High);
    }

    #[test]
    fn test_candidates_document_shape() {
        let doc = candidates_document("parkinson", CandidateTier::High).unwrap();
        assert_eq!(doc["total_candidates"], 3);
        assert_eq!(doc["candidates"][0]["protein"], "SNCA");
        assert_eq!(doc["candidates"][0]["confidence"], 0.95);
    }

    #[test]
    fn test_templates() {
        let template = workflow_template("pd-biomarker-discovery").unwrap();
        assert_eq!(template["steps"].as_array().unwrap().len(), 5);
        assert_eq!(template["confidence_thresholds"]["minimum_databases"], 2);
        assert!(workflow_template("clinical-translation").is_none());
    }

    #[test]
    fn test_dopaminergic_sets_by_mode() {
        assert_eq!(
            dopaminergic_proteins(DiscoveryMode::Minimal, true),
            vec!["TH", "DDC", "SLC6A3", "DRD2"]
        );
        assert_eq!(
            dopaminergic_proteins(DiscoveryMode::Standard, false),
            vec!["TH", "DDC", "SLC6A3", "SLC18A2", "DRD1", "DRD2", "COMT"]
        );

        let comprehensive = dopaminergic_proteins(DiscoveryMode::Comprehensive, true);
        assert_eq!(comprehensive.len(), 16);
        assert!(comprehensive.contains(&"PRKN") && comprehensive.contains(&"MAOB"));
        assert_eq!(dopaminergic_proteins(DiscoveryMode::Comprehensive, false).len(), 12);

        assert_eq!(
            dopaminergic_proteins(DiscoveryMode::HypothesisFree, true),
            vec!["TH", "SLC6A3", "DRD2", "SNCA", "PRKN"]
        );
    }

    #[test]
    fn test_dopaminergic_sets_are_canonical() {
        for mode in [
            DiscoveryMode::Minimal,
            DiscoveryMode::Standard,
            DiscoveryMode::Comprehensive,
            DiscoveryMode::HypothesisFree,
        ] {
            for protein in dopaminergic_proteins(mode, true) {
                assert_eq!(crate::fusion::gene_mapper::canonical_symbol(protein), protein);
            }
        }
    }

    #[test]
    fn test_discovery_mode_parse() {
        assert_eq!(DiscoveryMode::parse(" Hypothesis_Free ").unwrap(), DiscoveryMode::HypothesisFree);
        assert!(matches!(
            DiscoveryMode::parse("exhaustive"),
            Err(OrchestratorError::ValidationInput(_))
        ));
    }
}
