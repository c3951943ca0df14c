//! STRING Profile
//!
//! - Resolution: `map_proteins` → first mapped record (STRING id, preferred
//!   name, annotation). Confidence 0.95 (authoritative identifier mapping).
//! - Interactions: `get_network` → `network_data` rows with
//!   `preferredName_A`, `preferredName_B`, `score`.

use serde_json::{json, Value};

use super::{missing_field, parse_score, ServiceProfile, HUMAN_TAXON};
use crate::types::{InteractionEdge, ServiceOutcome};

/// Confidence of a returned STRING identifier mapping
const MAPPING_CONFIDENCE: f64 = 0.95;

pub struct StringProfile;

impl ServiceProfile for StringProfile {
    fn name(&self) -> &'static str {
        "string"
    }

    fn resolution_call(&self, identifier: &str) -> (&'static str, Value) {
        (
            "map_proteins",
            json!({ "proteins": [identifier], "species": HUMAN_TAXON }),
        )
    }

    fn decode_resolution(&self, raw: Value) -> ServiceOutcome {
        let mapped = match raw.get("mapped_proteins") {
            Some(Value::Array(mapped)) => mapped,
            Some(_) => {
                return ServiceOutcome::Malformed {
                    reason: "'mapped_proteins' is not a list".to_string(),
                }
            }
            None => return missing_field(&raw, "mapped_proteins"),
        };

        let Some(first) = mapped.first() else {
            return ServiceOutcome::NotFound {
                reason: "STRING returned no mapping".to_string(),
            };
        };

        let Some(string_id) = first.get("stringId").and_then(Value::as_str) else {
            return ServiceOutcome::Malformed {
                reason: "mapping has no 'stringId'".to_string(),
            };
        };

        ServiceOutcome::success(
            json!({
                "id": string_id,
                "name": first.get("preferredName"),
                "annotation": first.get("annotation"),
            }),
            MAPPING_CONFIDENCE,
        )
    }

    fn interaction_call(&self, proteins: &[String], threshold: f64) -> Option<(&'static str, Value)> {
        Some((
            "get_network",
            json!({
                "proteins": proteins,
                "species": HUMAN_TAXON,
                "confidence": threshold,
            }),
        ))
    }

    fn decode_interactions(&self, raw: Value) -> ServiceOutcome<Vec<InteractionEdge>> {
        let rows = match raw.get("network_data") {
            Some(Value::Array(rows)) => rows,
            Some(_) => {
                return ServiceOutcome::Malformed {
                    reason: "'network_data' is not a list".to_string(),
                }
            }
            None => return missing_field(&raw, "network_data"),
        };

        let mut edges = Vec::with_capacity(rows.len());
        for row in rows {
            let a = row.get("preferredName_A").and_then(Value::as_str);
            let b = row.get("preferredName_B").and_then(Value::as_str);
            let (Some(a), Some(b)) = (a, b) else {
                return ServiceOutcome::Malformed {
                    reason: "network row lacks preferredName_A/preferredName_B".to_string(),
                };
            };
            edges.push(InteractionEdge {
                protein_a: a.to_string(),
                protein_b: b.to_string(),
                source: self.name().to_string(),
                confidence: parse_score(row.get("score")),
            });
        }

        // Mean reported score; an empty network is a confident "no edges"
        let scores: Vec<f64> = edges.iter().filter_map(|e| e.confidence).collect();
        let confidence = if scores.is_empty() {
            MAPPING_CONFIDENCE
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        ServiceOutcome::success(edges, confidence)
    }

    fn network_heavy(&self) -> bool {
        true
    }
}
