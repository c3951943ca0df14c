//! Service Profiles
//!
//! Per-dependency knowledge: which tool answers a resolution or interaction
//! query, how its arguments are shaped, how its raw JSON response decodes
//! into a `ServiceOutcome`, and the per-source confidence policy.
//!
//! # Profiles
//! 1. STRING - identifier mapping + scored interaction network
//! 2. PRIDE - proteomics project search (resolution only)
//! 3. BioGRID - curated physical interactions (unscored)
//!
//! # Decoding Order
//! Each decoder looks for its expected fields first. Only when they are
//! absent does a dependency-reported `error` field turn the outcome into
//! `Unavailable`; anything else is `Malformed`.

pub mod biogrid;
pub mod pride;
pub mod string_db;

pub use biogrid::BiogridProfile;
pub use pride::PrideProfile;
pub use string_db::StringProfile;

use serde_json::Value;

use crate::types::{InteractionEdge, ServiceOutcome};

/// NCBI taxonomy id for human
pub const HUMAN_TAXON: u32 = 9606;

/// Dependency-specific query shapes and response decoding
pub trait ServiceProfile: Send + Sync {
    /// Service name as configured
    fn name(&self) -> &'static str;

    /// Tool and arguments resolving one identifier
    fn resolution_call(&self, identifier: &str) -> (&'static str, Value);

    /// Decode a resolution response
    fn decode_resolution(&self, raw: Value) -> ServiceOutcome;

    /// Tool and arguments fetching interactions among a protein set;
    /// `None` when the service holds no interaction data
    fn interaction_call(&self, proteins: &[String], threshold: f64) -> Option<(&'static str, Value)>;

    /// Decode an interaction response
    fn decode_interactions(&self, raw: Value) -> ServiceOutcome<Vec<InteractionEdge>>;

    /// Whether interaction calls return large networks (longer deadline)
    fn network_heavy(&self) -> bool {
        false
    }
}

static STRING: StringProfile = StringProfile;
static PRIDE: PrideProfile = PrideProfile;
static BIOGRID: BiogridProfile = BiogridProfile;

/// Profile for a known service name
pub fn profile_for(service: &str) -> Option<&'static dyn ServiceProfile> {
    match service {
        "string" => Some(&STRING),
        "pride" => Some(&PRIDE),
        "biogrid" => Some(&BIOGRID),
        _ => None,
    }
}

/// Services queried for resolution when the caller names none
pub const DEFAULT_RESOLUTION_SERVICES: &[&str] = &["string", "pride", "biogrid"];

/// Services queried for cross-validation when the caller names none
pub const DEFAULT_VALIDATION_SERVICES: &[&str] = &["string", "biogrid"];

/// Outcome for a response lacking the expected field
pub(crate) fn missing_field<T>(raw: &Value, field: &str) -> ServiceOutcome<T> {
    match raw.get("error").and_then(Value::as_str) {
        Some(error) => ServiceOutcome::Unavailable {
            reason: format!("dependency reported: {}", error),
        },
        None => ServiceOutcome::Malformed {
            reason: format!("response has no '{}' field", field),
        },
    }
}

/// Parse a score that may arrive as a number or a numeric string.
///
/// Scores on the 0-1000 integer scale are rescaled to 0.0-1.0.
pub(crate) fn parse_score(value: Option<&Value>) -> Option<f64> {
    let score = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if !score.is_finite() || score < 0.0 || score > 1000.0 {
        return None;
    }
    Some(if score > 1.0 { score / 1000.0 } else { score })
}
