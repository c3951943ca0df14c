//! BioGRID Profile
//!
//! Both resolution and interaction retrieval use `search_interactions`.
//! BioGRID answers either `{"interactions": [...]}` or its native shape, an
//! object keyed by interaction id. Records carry `OFFICIAL_SYMBOL_A` and
//! `OFFICIAL_SYMBOL_B` and no score.
//!
//! Resolution confidence: `min(0.9, 0.4 + 0.01 × interaction_count)`.

use serde_json::{json, Map, Value};

use super::{missing_field, ServiceProfile, HUMAN_TAXON};
use crate::types::{InteractionEdge, ServiceOutcome};

/// Sample interactions kept in the resolution payload
const SAMPLE_SIZE: usize = 3;

pub struct BiogridProfile;

impl BiogridProfile {
    /// More curated interactions → higher confidence, capped at 0.9
    pub fn interaction_confidence(interaction_count: usize) -> f64 {
        (0.4 + interaction_count as f64 * 0.01).min(0.9)
    }

    fn arguments(genes: &[&str]) -> Value {
        json!({ "gene_names": genes, "organism": HUMAN_TAXON.to_string() })
    }

    /// Interaction records in either response shape
    fn records(raw: &Value) -> Result<Vec<&Value>, ServiceOutcome<()>> {
        match raw.get("interactions") {
            Some(Value::Array(items)) => Ok(items.iter().collect()),
            Some(Value::Object(map)) => Ok(map.values().collect()),
            Some(_) => Err(ServiceOutcome::Malformed {
                reason: "'interactions' is neither a list nor a map".to_string(),
            }),
            None => match raw.as_object() {
                Some(map) if is_native_shape(map) => Ok(map.values().collect()),
                _ => Err(missing_field(raw, "interactions")),
            },
        }
    }
}

/// Native BioGRID JSON: non-empty object of interaction records
fn is_native_shape(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && !map.contains_key("error")
        && map.values().all(|v| v.get("OFFICIAL_SYMBOL_A").is_some())
}

fn symbol_pair(record: &Value) -> Option<(&str, &str)> {
    let a = record.get("OFFICIAL_SYMBOL_A").and_then(Value::as_str)?;
    let b = record.get("OFFICIAL_SYMBOL_B").and_then(Value::as_str)?;
    Some((a, b))
}

fn retag<T>(outcome: ServiceOutcome<()>) -> ServiceOutcome<T> {
    match outcome {
        ServiceOutcome::Success { confidence, .. } => ServiceOutcome::Malformed {
            reason: format!("unexpected success tag ({})", confidence),
        },
        ServiceOutcome::NotFound { reason } => ServiceOutcome::NotFound { reason },
        ServiceOutcome::Unavailable { reason } => ServiceOutcome::Unavailable { reason },
        ServiceOutcome::Timeout => ServiceOutcome::Timeout,
        ServiceOutcome::Malformed { reason } => ServiceOutcome::Malformed { reason },
    }
}

impl ServiceProfile for BiogridProfile {
    fn name(&self) -> &'static str {
        "biogrid"
    }

    fn resolution_call(&self, identifier: &str) -> (&'static str, Value) {
        ("search_interactions", Self::arguments(&[identifier]))
    }

    fn decode_resolution(&self, raw: Value) -> ServiceOutcome {
        let records = match Self::records(&raw) {
            Ok(records) => records,
            Err(outcome) => return retag(outcome),
        };

        if records.is_empty() {
            return ServiceOutcome::NotFound {
                reason: "BioGRID returned no interactions".to_string(),
            };
        }

        let sample: Vec<Value> = records
            .iter()
            .filter_map(|r| symbol_pair(r))
            .take(SAMPLE_SIZE)
            .map(|(a, b)| json!([a, b]))
            .collect();

        ServiceOutcome::success(
            json!({
                "interaction_count": records.len(),
                "sample_interactions": sample,
            }),
            Self::interaction_confidence(records.len()),
        )
    }

    fn interaction_call(&self, proteins: &[String], _threshold: f64) -> Option<(&'static str, Value)> {
        let genes: Vec<&str> = proteins.iter().map(String::as_str).collect();
        Some(("search_interactions", Self::arguments(&genes)))
    }

    fn decode_interactions(&self, raw: Value) -> ServiceOutcome<Vec<InteractionEdge>> {
        let records = match Self::records(&raw) {
            Ok(records) => records,
            Err(outcome) => return retag(outcome),
        };

        let mut edges = Vec::with_capacity(records.len());
        for record in &records {
            let Some((a, b)) = symbol_pair(record) else {
                return ServiceOutcome::Malformed {
                    reason: "interaction record lacks OFFICIAL_SYMBOL_A/OFFICIAL_SYMBOL_B".to_string(),
                };
            };
            edges.push(InteractionEdge {
                protein_a: a.to_string(),
                protein_b: b.to_string(),
                source: self.name().to_string(),
                confidence: None,
            });
        }

        let confidence = Self::interaction_confidence(edges.len());
        ServiceOutcome::success(edges, confidence)
    }
}
