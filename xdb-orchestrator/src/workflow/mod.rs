//! Multi-step research workflows
//!
//! A workflow is an ordered list of steps. Each step performs one action
//! (resolve proteins, cross-validate interactions, or read curated context)
//! and may depend on earlier steps by name.
//!
//! # Failure Isolation
//! - A failed step never aborts the run
//! - Dependents of a failed step are skipped, never attempted
//! - Independent later steps still execute
//!
//! Definition errors (duplicate names, unknown or forward dependencies) are
//! rejected before any step runs.

pub mod catalog;
pub mod executor;

pub use executor::WorkflowExecutor;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::fusion::cross_validator::DEFAULT_THRESHOLD;
use crate::types::StepKind;

/// Where a step takes its protein set from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProteinSource {
    /// Run parameters (`target_proteins`)
    Parameters,
    /// Identifiers resolved by an earlier resolution step
    ResolvedFrom(String),
}

/// Work performed by a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepAction {
    Resolve {
        proteins: ProteinSource,
        /// `None` = default resolution services
        #[serde(default, skip_serializing_if = "Option::is_none")]
        services: Option<Vec<String>>,
    },
    Validate {
        proteins: ProteinSource,
        /// `None` = default validation services
        #[serde(default, skip_serializing_if = "Option::is_none")]
        services: Option<Vec<String>>,
        /// `None` = run parameter threshold
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f64>,
    },
    StaticContext {
        uri: String,
    },
}

impl StepAction {
    pub fn kind(&self) -> StepKind {
        match self {
            StepAction::Resolve { .. } => StepKind::Resolution,
            StepAction::Validate { .. } => StepKind::Validation,
            StepAction::StaticContext { .. } => StepKind::StaticContext,
        }
    }

    fn protein_source(&self) -> Option<&ProteinSource> {
        match self {
            StepAction::Resolve { proteins, .. } | StepAction::Validate { proteins, .. } => Some(proteins),
            StepAction::StaticContext { .. } => None,
        }
    }
}

/// One declared step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub name: String,
    pub action: StepAction,
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Failure of an optional step does not make the run partial
    #[serde(default)]
    pub optional: bool,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            name: name.into(),
            action,
            depends_on: Vec::new(),
            optional: false,
        }
    }

    /// Declare a dependency on an earlier step
    pub fn after(mut self, step: impl Into<String>) -> Self {
        self.depends_on.push(step.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Named, ordered list of steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    pub description: String,
    pub steps: Vec<StepDefinition>,
}

impl WorkflowDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, steps: Vec<StepDefinition>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            steps,
        }
    }

    /// Whether any step reads its proteins from the run parameters
    pub fn uses_parameters(&self) -> bool {
        self.steps
            .iter()
            .any(|s| s.action.protein_source() == Some(&ProteinSource::Parameters))
    }

    /// Reject malformed definitions before anything runs
    pub fn check(&self) -> OrchestratorResult<()> {
        if self.steps.is_empty() {
            return Err(invalid(format!("workflow '{}' has no steps", self.name)));
        }

        // name → kind, for steps declared so far
        let mut seen: HashMap<&str, StepKind> = HashMap::new();

        for (position, step) in self.steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(invalid(format!("step {} has an empty name", position + 1)));
            }

            for dep in &step.depends_on {
                if dep == &step.name {
                    return Err(invalid(format!("step '{}' depends on itself", step.name)));
                }
                if !seen.contains_key(dep.as_str()) {
                    let later = self.steps.iter().skip(position + 1).any(|s| &s.name == dep);
                    return Err(invalid(if later {
                        format!("step '{}' depends on later step '{}'", step.name, dep)
                    } else {
                        format!("step '{}' depends on unknown step '{}'", step.name, dep)
                    }));
                }
            }

            if let Some(ProteinSource::ResolvedFrom(source)) = step.action.protein_source() {
                if !step.depends_on.contains(source) {
                    return Err(invalid(format!(
                        "step '{}' reads proteins from '{}' without depending on it",
                        step.name, source
                    )));
                }
                if seen.get(source.as_str()) != Some(&StepKind::Resolution) {
                    return Err(invalid(format!(
                        "step '{}' reads proteins from non-resolution step '{}'",
                        step.name, source
                    )));
                }
            }

            if let StepAction::Validate { threshold: Some(t), .. } = &step.action {
                if !(0.0..=1.0).contains(t) {
                    return Err(invalid(format!("step '{}' threshold {} outside 0..1", step.name, t)));
                }
            }

            if seen.insert(step.name.as_str(), step.action.kind()).is_some() {
                return Err(invalid(format!("duplicate step name '{}'", step.name)));
            }
        }
        Ok(())
    }
}

/// Caller-supplied run inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowParameters {
    pub proteins: Vec<String>,
    pub confidence_threshold: f64,
}

impl WorkflowParameters {
    pub fn new(proteins: Vec<String>) -> Self {
        Self {
            proteins,
            confidence_threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }
}

fn invalid(message: String) -> OrchestratorError {
    OrchestratorError::ValidationInput(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve() -> StepAction {
        StepAction::Resolve {
            proteins: ProteinSource::Parameters,
            services: None,
        }
    }

    fn validate_from(step: &str) -> StepAction {
        StepAction::Validate {
            proteins: ProteinSource::ResolvedFrom(step.to_string()),
            services: None,
            threshold: None,
        }
    }

    fn context() -> StepAction {
        StepAction::StaticContext {
            uri: "biomarkers://parkinson/high".into(),
        }
    }

    fn expect_invalid(def: WorkflowDefinition, fragment: &str) {
        match def.check() {
            Err(OrchestratorError::ValidationInput(msg)) => {
                assert!(msg.contains(fragment), "'{}' should mention '{}'", msg, fragment)
            }
            other => panic!("expected input error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_definition() {
        let def = WorkflowDefinition::new(
            "wf",
            "",
            vec![
                StepDefinition::new("a", resolve()),
                StepDefinition::new("b", validate_from("a")).after("a"),
                StepDefinition::new("c", context()).optional(),
            ],
        );
        assert!(def.check().is_ok());
        assert!(def.uses_parameters());
    }

    #[test]
    fn test_definition_errors() {
        expect_invalid(WorkflowDefinition::new("wf", "", vec![]), "no steps");
        expect_invalid(
            WorkflowDefinition::new(
                "wf",
                "",
                vec![StepDefinition::new("a", context()), StepDefinition::new("a", context())],
            ),
            "duplicate",
        );
        expect_invalid(
            WorkflowDefinition::new(
                "wf",
                "",
                vec![
                    StepDefinition::new("b", context()).after("a"),
                    StepDefinition::new("a", context()),
                ],
            ),
            "later step",
        );
        expect_invalid(
            WorkflowDefinition::new("wf", "", vec![StepDefinition::new("b", context()).after("zzz")]),
            "unknown step",
        );
        expect_invalid(
            WorkflowDefinition::new(
                "wf",
                "",
                vec![StepDefinition::new("a", resolve()), StepDefinition::new("b", validate_from("a"))],
            ),
            "without depending",
        );
        expect_invalid(
            WorkflowDefinition::new(
                "wf",
                "",
                vec![
                    StepDefinition::new("a", context()),
                    StepDefinition::new("b", validate_from("a")).after("a"),
                ],
            ),
            "non-resolution",
        );
    }

    #[test]
    fn test_action_serialization() {
        let value = serde_json::to_value(validate_from("resolve_targets")).unwrap();
        assert_eq!(value["kind"], "validate");
        assert_eq!(value["proteins"]["resolved_from"], "resolve_targets");
        assert!(value.get("services").is_none());
    }
}
