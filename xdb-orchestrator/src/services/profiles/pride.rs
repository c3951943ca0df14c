//! PRIDE Profile
//!
//! Resolution: `search_projects` → project count and sample accessions.
//! Confidence grows with the number of datasets: `min(0.9, 0.3 + 0.1 × n)`.
//! PRIDE holds no interaction data.

use serde_json::{json, Value};

use super::{missing_field, ServiceProfile};
use crate::types::{InteractionEdge, ServiceOutcome};

/// Projects requested per search
const SEARCH_PAGE_SIZE: usize = 5;

/// Sample accessions kept in the payload
const SAMPLE_SIZE: usize = 3;

pub struct PrideProfile;

impl PrideProfile {
    /// More datasets → higher confidence, capped at 0.9
    pub fn dataset_confidence(project_count: usize) -> f64 {
        (0.3 + project_count as f64 * 0.1).min(0.9)
    }
}

impl ServiceProfile for PrideProfile {
    fn name(&self) -> &'static str {
        "pride"
    }

    fn resolution_call(&self, identifier: &str) -> (&'static str, Value) {
        (
            "search_projects",
            json!({ "query": identifier, "size": SEARCH_PAGE_SIZE }),
        )
    }

    fn decode_resolution(&self, raw: Value) -> ServiceOutcome {
        let projects = match raw.get("projects") {
            Some(Value::Array(projects)) => projects,
            Some(_) => {
                return ServiceOutcome::Malformed {
                    reason: "'projects' is not a list".to_string(),
                }
            }
            None => return missing_field(&raw, "projects"),
        };

        if projects.is_empty() {
            return ServiceOutcome::NotFound {
                reason: "PRIDE returned no projects".to_string(),
            };
        }

        let sample: Vec<&Value> = projects
            .iter()
            .take(SAMPLE_SIZE)
            .filter_map(|p| p.get("accession"))
            .collect();

        ServiceOutcome::success(
            json!({
                "dataset_count": projects.len(),
                "sample_projects": sample,
            }),
            Self::dataset_confidence(projects.len()),
        )
    }

    fn interaction_call(&self, _proteins: &[String], _threshold: f64) -> Option<(&'static str, Value)> {
        None
    }

    fn decode_interactions(&self, _raw: Value) -> ServiceOutcome<Vec<InteractionEdge>> {
        ServiceOutcome::Malformed {
            reason: "PRIDE does not provide interaction data".to_string(),
        }
    }
}
