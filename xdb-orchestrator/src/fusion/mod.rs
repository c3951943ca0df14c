// Fusion Module - multi-source evidence aggregation
//
// Tier 1: per-service outcomes (services::profiles)
// Tier 2: aggregation (confidence_scorer, protein_resolver, cross_validator)
// gene_mapper normalizes identifiers for both engines.
// reference_network runs the validator over the curated dopaminergic set.

pub mod confidence_scorer;
pub mod cross_validator;
pub mod gene_mapper;
pub mod protein_resolver;
pub mod reference_network;

pub use confidence_scorer::{score, ConfidenceScore};
pub use cross_validator::{compute_evidence, CrossValidator, Evidence};
pub use protein_resolver::ProteinResolver;
pub use reference_network::{ConfidenceDistribution, ReferenceNetwork};
