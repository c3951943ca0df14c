//! Core Types for the Cross-Database Orchestrator
//!
//! Defines the data model shared by the engines:
//! - **ServiceOutcome:** typed per-(identifier, service) result
//! - **Resolution:** ResolutionResult, ResolutionStatus
//! - **Validation:** InteractionEdge, EdgeKey, ValidationResult
//! - **Workflow:** StepStatus, StepResult, WorkflowRun

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

// ============================================================================
// Service Outcomes
// ============================================================================

/// Outcome of one dependency call, decoded at the adapter boundary.
///
/// Only `Success` carries a confidence. The other variants are excluded from
/// confidence arithmetic entirely (never counted as zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ServiceOutcome<T = Value> {
    /// Dependency answered with a decodable record
    Success {
        payload: T,
        /// Per-source confidence (0.0-1.0)
        confidence: f64,
    },
    /// Dependency answered well-formed but holds no record for the query
    NotFound { reason: String },
    /// Connection failure, non-success status, or dependency-reported error
    Unavailable { reason: String },
    /// Per-call deadline exceeded
    Timeout,
    /// Response received but not decodable into the expected shape
    Malformed { reason: String },
}

impl<T> ServiceOutcome<T> {
    /// Create a success outcome with clamped confidence (0.0-1.0)
    pub fn success(payload: T, confidence: f64) -> Self {
        ServiceOutcome::Success {
            payload,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ServiceOutcome::Success { .. })
    }

    /// Confidence, defined only for `Success`
    pub fn confidence(&self) -> Option<f64> {
        match self {
            ServiceOutcome::Success { confidence, .. } => Some(*confidence),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            ServiceOutcome::Success { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Short label for logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            ServiceOutcome::Success { .. } => "success",
            ServiceOutcome::NotFound { .. } => "not_found",
            ServiceOutcome::Unavailable { .. } => "unavailable",
            ServiceOutcome::Timeout => "timeout",
            ServiceOutcome::Malformed { .. } => "malformed",
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Aggregate status over the queried services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Every queried service answered with a record
    Resolved,
    /// Some but not all services answered (aggregation degraded)
    Partial,
    /// No service answered with a record
    Unresolved,
}

/// Protein-entity resolution across services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Caller-supplied identifier, as given
    pub identifier: String,
    /// Canonical symbol used for comparisons
    pub canonical_symbol: String,
    /// Known aliases of the identifier (curated table)
    pub aliases: Vec<String>,
    /// One outcome per requested service, keyed by service name
    pub outcomes: BTreeMap<String, ServiceOutcome>,
    pub status: ResolutionStatus,
    /// Coverage-discounted mean confidence (0.0-1.0)
    pub confidence: f64,
}

impl ResolutionResult {
    /// Services that answered with a record
    pub fn resolved_services(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_success())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Services that did not answer with a record
    pub fn degraded_services(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

// ============================================================================
// Cross-Validation
// ============================================================================

/// Interaction as reported by one service (endpoints as reported)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEdge {
    pub protein_a: String,
    pub protein_b: String,
    /// Reporting service
    pub source: String,
    /// Confidence reported by the service, if it scores interactions
    pub confidence: Option<f64>,
}

/// Normalized unordered endpoint pair; two edges are the same interaction
/// iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey(pub String, pub String);

impl EdgeKey {
    /// Order the (already normalized) endpoints
    pub fn new(a: String, b: String) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.0 == self.1
    }
}

/// Interaction reported by at least two independent services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergentEdge {
    pub proteins: EdgeKey,
    /// Contributing services with their confidence, by service name
    pub sources: BTreeMap<String, f64>,
    /// Mean of the contributing services' confidences
    pub validation_confidence: f64,
}

/// Interaction reported by exactly one service (or only one above threshold)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleSourceEdge {
    pub proteins: EdgeKey,
    pub source: String,
    pub confidence: f64,
}

/// Qualitative evidence level for a validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLevel {
    /// At least one convergent interaction
    High,
    /// Interactions found, none convergent
    Moderate,
    /// No usable interaction data
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub services_answered: usize,
    pub services_queried: usize,
    pub total_edges: usize,
    pub convergent_count: usize,
    pub single_source_count: usize,
    pub evidence_level: EvidenceLevel,
}

/// Cross-database interaction validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub proteins: Vec<String>,
    /// Per-service outcome carrying that service's edge list
    pub services: BTreeMap<String, ServiceOutcome<Vec<InteractionEdge>>>,
    /// Sorted by endpoint pair
    pub convergent: Vec<ConvergentEdge>,
    /// Sorted by endpoint pair, then source
    pub single_source: Vec<SingleSourceEdge>,
    pub confidence_threshold: f64,
    pub summary: ValidationSummary,
}

// ============================================================================
// Workflow
// ============================================================================

/// Kind of work a step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Resolution,
    Validation,
    StaticContext,
}

/// Step execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Succeeded,
    Failed,
    SkippedDueToDependency,
}

/// Result of one workflow step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub kind: StepKind,
    pub depends_on: Vec<String>,
    pub optional: bool,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every non-optional step succeeded
    Succeeded,
    /// At least one non-optional step failed or was skipped
    Partial,
}

/// One execution of a workflow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub run_id: Uuid,
    pub workflow: String,
    /// Step results in declared order
    pub steps: Vec<StepResult>,
    pub status: RunStatus,
    pub recommendations: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl WorkflowRun {
    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.name == name)
    }
}
