//! Built-in workflow definitions and run recommendations

use serde::Serialize;

use super::{ProteinSource, StepAction, StepDefinition, WorkflowDefinition};
use crate::resources::OVERVIEW_URI;

pub const BIOMARKER_DISCOVERY: &str = "biomarker_discovery";
pub const CROSS_DATABASE_VALIDATION: &str = "cross_database_validation";
pub const PROTEIN_PROFILING: &str = "protein_profiling";

/// Workflow run when the caller names none
pub const DEFAULT_WORKFLOW: &str = BIOMARKER_DISCOVERY;

/// Target proteins used when the caller names none
pub const DEFAULT_TARGETS: &[&str] = &["SNCA", "PARK2", "TH"];

/// Names of the built-in workflows
pub const WORKFLOW_NAMES: &[&str] = &[BIOMARKER_DISCOVERY, CROSS_DATABASE_VALIDATION, PROTEIN_PROFILING];

/// Built-in workflow by name
pub fn builtin(name: &str) -> Option<WorkflowDefinition> {
    match name {
        BIOMARKER_DISCOVERY => Some(WorkflowDefinition::new(
            BIOMARKER_DISCOVERY,
            "Review curated candidates, resolve the targets, then cross-validate their interactions",
            vec![
                StepDefinition::new(
                    "candidate_context",
                    StepAction::StaticContext {
                        uri: "biomarkers://parkinson/high".to_string(),
                    },
                )
                .optional(),
                StepDefinition::new(
                    "resolve_targets",
                    StepAction::Resolve {
                        proteins: ProteinSource::Parameters,
                        services: None,
                    },
                ),
                StepDefinition::new(
                    "validate_interactions",
                    StepAction::Validate {
                        proteins: ProteinSource::ResolvedFrom("resolve_targets".to_string()),
                        services: None,
                        threshold: None,
                    },
                )
                .after("resolve_targets"),
            ],
        )),
        CROSS_DATABASE_VALIDATION => Some(WorkflowDefinition::new(
            CROSS_DATABASE_VALIDATION,
            "Cross-validate interactions among the targets across STRING and BioGRID",
            vec![StepDefinition::new(
                "validate_interactions",
                StepAction::Validate {
                    proteins: ProteinSource::Parameters,
                    services: None,
                    threshold: None,
                },
            )],
        )),
        PROTEIN_PROFILING => Some(WorkflowDefinition::new(
            PROTEIN_PROFILING,
            "Resolve the targets across all databases alongside the research overview",
            vec![
                StepDefinition::new(
                    "resolve_targets",
                    StepAction::Resolve {
                        proteins: ProteinSource::Parameters,
                        services: None,
                    },
                ),
                StepDefinition::new(
                    "research_overview",
                    StepAction::StaticContext {
                        uri: OVERVIEW_URI.to_string(),
                    },
                )
                .optional(),
            ],
        )),
        _ => None,
    }
}

/// Listing entry for `list_workflows`
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub name: String,
    pub description: String,
    pub steps: Vec<String>,
}

pub fn list() -> Vec<WorkflowSummary> {
    WORKFLOW_NAMES
        .iter()
        .filter_map(|name| builtin(name))
        .map(|def| WorkflowSummary {
            steps: def.steps.iter().map(|s| s.name.clone()).collect(),
            name: def.name,
            description: def.description,
        })
        .collect()
}

/// Recommendations from fully resolved proteins and convergent interactions
pub fn recommendations(resolved: &[String], convergent: usize) -> Vec<String> {
    if resolved.len() >= 2 && convergent > 0 {
        vec![
            format!("Strong candidates identified: {}", resolved.join(", ")),
            format!("Found {} interactions with convergent evidence", convergent),
            "Proceed with dataset analysis for validation".to_string(),
            "Consider expanding to related pathway proteins".to_string(),
        ]
    } else {
        vec![
            "Limited cross-database evidence found".to_string(),
            "Consider broader protein search".to_string(),
            "Review individual database results".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_well_formed() {
        for name in WORKFLOW_NAMES {
            let def = builtin(name).unwrap();
            assert_eq!(def.name, *name);
            def.check().unwrap();
        }
        assert!(builtin("clinical_translation").is_none());
    }

    #[test]
    fn test_listing() {
        let listed = list();
        assert_eq!(listed.len(), 3);
        assert_eq!(
            listed[0].steps,
            vec!["candidate_context", "resolve_targets", "validate_interactions"]
        );
    }

    #[test]
    fn test_recommendations() {
        let strong = recommendations(&["SNCA".to_string(), "TH".to_string()], 2);
        assert_eq!(strong[0], "Strong candidates identified: SNCA, TH");

        let weak = recommendations(&["SNCA".to_string()], 5);
        assert_eq!(weak[0], "Limited cross-database evidence found");
        assert_eq!(recommendations(&[], 0).len(), 3);
    }
}
