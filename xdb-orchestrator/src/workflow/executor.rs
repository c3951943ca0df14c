//! Workflow Executor
//!
//! Runs a workflow definition step by step in declared order.
//!
//! # Step Semantics
//! - Resolution step fails when no protein resolved in any service
//! - Validation step fails when no service answered the interaction query
//! - Context step fails when its resource cannot be read
//! - A step whose dependency did not succeed is skipped, never attempted
//!
//! # Run Status
//! `succeeded` iff every non-optional step succeeded, otherwise `partial`.
//!
//! # Cancellation
//! The run observes a `CancellationToken`; cancelling abandons the in-flight
//! step and returns `OrchestratorError::Cancelled`.

use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use super::{catalog, ProteinSource, StepAction, StepDefinition, WorkflowDefinition, WorkflowParameters};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::fusion::{CrossValidator, ProteinResolver};
use crate::resources::ResourceCatalog;
use crate::services::profiles::{DEFAULT_RESOLUTION_SERVICES, DEFAULT_VALIDATION_SERVICES};
use crate::services::ServiceClient;
use crate::types::{ResolutionStatus, RunStatus, StepResult, StepStatus, WorkflowRun};

/// Services used by steps that name none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefaults {
    pub resolution: Vec<String>,
    pub validation: Vec<String>,
}

impl ServiceDefaults {
    /// Default services that the client has configured
    pub fn for_client(client: &ServiceClient) -> Self {
        let configured = |names: &[&str]| -> Vec<String> {
            names
                .iter()
                .filter(|name| client.is_configured(name))
                .map(|name| name.to_string())
                .collect()
        };
        Self {
            resolution: configured(DEFAULT_RESOLUTION_SERVICES),
            validation: configured(DEFAULT_VALIDATION_SERVICES),
        }
    }
}

/// Step outputs visible to later steps
#[derive(Debug, Default)]
struct RunContext {
    /// Resolution step name → identifiers resolved by at least one service
    resolved: HashMap<String, Vec<String>>,
    /// Identifiers resolved by every queried service, across the run
    fully_resolved: Vec<String>,
    /// Convergent interactions found, across the run
    convergent: usize,
}

/// Executes workflow definitions against the engines
pub struct WorkflowExecutor {
    resolver: ProteinResolver,
    validator: CrossValidator,
    resources: Arc<ResourceCatalog>,
    defaults: ServiceDefaults,
}

impl WorkflowExecutor {
    pub fn new(
        resolver: ProteinResolver,
        validator: CrossValidator,
        resources: Arc<ResourceCatalog>,
        defaults: ServiceDefaults,
    ) -> Self {
        Self {
            resolver,
            validator,
            resources,
            defaults,
        }
    }

    /// Run a workflow to completion (or cancellation)
    pub async fn run(
        &self,
        definition: &WorkflowDefinition,
        params: &WorkflowParameters,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<WorkflowRun> {
        definition.check()?;
        check_parameters(definition, params)?;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            run_id = %run_id,
            workflow = %definition.name,
            steps = definition.steps.len(),
            proteins = params.proteins.len(),
            "Workflow run started"
        );

        let mut ctx = RunContext::default();
        let mut statuses: HashMap<&str, StepStatus> = HashMap::new();
        let mut steps = Vec::with_capacity(definition.steps.len());

        for step in &definition.steps {
            if cancel.is_cancelled() {
                return Err(cancelled(&definition.name, &step.name));
            }

            let started = Instant::now();
            let blocked = step
                .depends_on
                .iter()
                .find(|dep| statuses.get(dep.as_str()) != Some(&StepStatus::Succeeded));

            let (status, output, error) = match blocked {
                Some(dep) => {
                    info!(run_id = %run_id, step = %step.name, dependency = %dep, "Step skipped");
                    (
                        StepStatus::SkippedDueToDependency,
                        None,
                        Some(format!("dependency '{}' did not succeed", dep)),
                    )
                }
                None => {
                    let outcome = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(cancelled(&definition.name, &step.name)),
                        outcome = self.execute(step, params, &mut ctx) => outcome,
                    };
                    match outcome {
                        Ok(value) => {
                            info!(run_id = %run_id, step = %step.name, "Step succeeded");
                            (StepStatus::Succeeded, Some(value), None)
                        }
                        Err(message) => {
                            warn!(run_id = %run_id, step = %step.name, error = %message, "Step failed");
                            (StepStatus::Failed, None, Some(message))
                        }
                    }
                }
            };

            statuses.insert(step.name.as_str(), status);
            steps.push(StepResult {
                name: step.name.clone(),
                kind: step.action.kind(),
                depends_on: step.depends_on.clone(),
                optional: step.optional,
                status,
                output,
                error,
                duration_ms: started.elapsed().as_millis() as u64,
            });
        }

        let status = if steps
            .iter()
            .filter(|s| !s.optional)
            .all(|s| s.status == StepStatus::Succeeded)
        {
            RunStatus::Succeeded
        } else {
            RunStatus::Partial
        };

        let run = WorkflowRun {
            run_id,
            workflow: definition.name.clone(),
            steps,
            status,
            recommendations: catalog::recommendations(&ctx.fully_resolved, ctx.convergent),
            started_at,
            completed_at: Utc::now(),
        };

        info!(
            run_id = %run_id,
            workflow = %run.workflow,
            status = ?run.status,
            "Workflow run complete"
        );
        Ok(run)
    }

    /// Execute one step; `Err` carries the step's failure message
    async fn execute(
        &self,
        step: &StepDefinition,
        params: &WorkflowParameters,
        ctx: &mut RunContext,
    ) -> Result<Value, String> {
        match &step.action {
            StepAction::Resolve { proteins, services } => {
                let proteins = proteins_for(proteins, params, ctx)?;
                let services = services.clone().unwrap_or_else(|| self.defaults.resolution.clone());
                let results = self
                    .resolver
                    .resolve_many(&proteins, &services)
                    .await
                    .map_err(|e| e.to_string())?;

                let resolved: Vec<String> = results
                    .iter()
                    .filter(|r| r.status != ResolutionStatus::Unresolved)
                    .map(|r| r.identifier.clone())
                    .collect();
                if resolved.is_empty() {
                    return Err("no protein resolved in any service".to_string());
                }

                let fully: Vec<String> = results
                    .iter()
                    .filter(|r| r.status == ResolutionStatus::Resolved)
                    .map(|r| r.identifier.clone())
                    .collect();
                let success_rate = fully.len() as f64 / results.len() as f64;

                for id in &fully {
                    if !ctx.fully_resolved.contains(id) {
                        ctx.fully_resolved.push(id.clone());
                    }
                }
                ctx.resolved.insert(step.name.clone(), resolved.clone());

                Ok(json!({
                    "resolutions": results,
                    "resolved": resolved,
                    "success_rate": success_rate,
                }))
            }
            StepAction::Validate {
                proteins,
                services,
                threshold,
            } => {
                let proteins = proteins_for(proteins, params, ctx)?;
                let services = services.clone().unwrap_or_else(|| self.defaults.validation.clone());
                let threshold = threshold.unwrap_or(params.confidence_threshold);
                let result = self
                    .validator
                    .validate(&proteins, &services, threshold)
                    .await
                    .map_err(|e| e.to_string())?;

                if result.summary.services_answered == 0 {
                    return Err("no service answered the interaction query".to_string());
                }
                ctx.convergent += result.summary.convergent_count;

                serde_json::to_value(&result).map_err(|e| e.to_string())
            }
            StepAction::StaticContext { uri } => self.resources.read(uri).await.map_err(|e| e.to_string()),
        }
    }
}

fn proteins_for(source: &ProteinSource, params: &WorkflowParameters, ctx: &RunContext) -> Result<Vec<String>, String> {
    match source {
        ProteinSource::Parameters => Ok(params.proteins.clone()),
        ProteinSource::ResolvedFrom(step) => ctx
            .resolved
            .get(step)
            .filter(|ids| !ids.is_empty())
            .cloned()
            .ok_or_else(|| format!("no proteins available from step '{}'", step)),
    }
}

fn check_parameters(definition: &WorkflowDefinition, params: &WorkflowParameters) -> OrchestratorResult<()> {
    if !(0.0..=1.0).contains(&params.confidence_threshold) {
        return Err(OrchestratorError::ValidationInput(format!(
            "confidence threshold must be within 0..1, got {}",
            params.confidence_threshold
        )));
    }
    if definition.uses_parameters() {
        if params.proteins.is_empty() {
            return Err(OrchestratorError::ValidationInput(format!(
                "workflow '{}' needs at least one target protein",
                definition.name
            )));
        }
        if params.proteins.iter().any(|p| p.trim().is_empty()) {
            return Err(OrchestratorError::ValidationInput(
                "target proteins must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn cancelled(workflow: &str, step: &str) -> OrchestratorError {
    warn!(workflow, step, "Workflow run cancelled");
    OrchestratorError::Cancelled(format!("workflow '{}' cancelled at step '{}'", workflow, step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceTimeouts;
    use crate::test_support::ScriptedTransport;
    use std::time::Duration;

    fn executor(transport: ScriptedTransport) -> WorkflowExecutor {
        let services = ["string", "pride", "biogrid"]
            .into_iter()
            .map(|name| (name.to_string(), ServiceTimeouts::default()))
            .collect();
        let client = Arc::new(ServiceClient::new(Arc::new(transport), services));
        WorkflowExecutor::new(
            ProteinResolver::new(Arc::clone(&client), None),
            CrossValidator::new(Arc::clone(&client), None),
            Arc::new(ResourceCatalog::new(Arc::clone(&client))),
            ServiceDefaults::for_client(&client),
        )
    }

    fn healthy() -> ScriptedTransport {
        ScriptedTransport::new()
            .respond(
                "string",
                "map_proteins",
                json!({"mapped_proteins": [{"stringId": "9606.ENSP00000338345", "preferredName": "SNCA"}]}),
            )
            .respond("pride", "search_projects", json!({"projects": [{"accession": "PXD015293"}]}))
            .respond(
                "biogrid",
                "search_interactions",
                json!({"interactions": [
                    {"OFFICIAL_SYMBOL_A": "PARK2", "OFFICIAL_SYMBOL_B": "SNCA"},
                    {"OFFICIAL_SYMBOL_A": "TH", "OFFICIAL_SYMBOL_B": "SNCA"}
                ]}),
            )
            .respond(
                "string",
                "get_network",
                json!({"network_data": [
                    {"preferredName_A": "SNCA", "preferredName_B": "PRKN", "score": 0.9},
                    {"preferredName_A": "SNCA", "preferredName_B": "TH", "score": 0.8}
                ]}),
            )
    }

    fn resolve_with(services: &[&str]) -> StepAction {
        StepAction::Resolve {
            proteins: ProteinSource::Parameters,
            services: Some(services.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn validate_from(step: &str) -> StepAction {
        StepAction::Validate {
            proteins: ProteinSource::ResolvedFrom(step.to_string()),
            services: None,
            threshold: None,
        }
    }

    fn missing_context() -> StepAction {
        StepAction::StaticContext {
            uri: "workflow://does-not-exist".to_string(),
        }
    }

    fn params() -> WorkflowParameters {
        WorkflowParameters::new(vec!["SNCA".into(), "PRKN".into()])
    }

    #[tokio::test]
    async fn test_independent_failure_gives_partial_run() {
        let def = WorkflowDefinition::new(
            "wf",
            "",
            vec![
                StepDefinition::new("a", resolve_with(&["string"])),
                StepDefinition::new("b", validate_from("a")).after("a"),
                StepDefinition::new("c", missing_context()),
            ],
        );

        let run = executor(healthy())
            .run(&def, &params(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(run.status, RunStatus::Partial);
        assert_eq!(run.step("a").unwrap().status, StepStatus::Succeeded);
        assert_eq!(run.step("b").unwrap().status, StepStatus::Succeeded);
        assert_eq!(run.step("c").unwrap().status, StepStatus::Failed);
        assert!(run.steps.iter().all(|s| s.status != StepStatus::SkippedDueToDependency));
        assert!(run.step("c").unwrap().error.is_some());
    }

    #[tokio::test]
    async fn test_dependent_of_failed_step_never_attempted() {
        // No scripts: every dependency call is unavailable
        let transport = ScriptedTransport::new();
        let calls = transport.call_log();
        let def = WorkflowDefinition::new(
            "wf",
            "",
            vec![
                StepDefinition::new("a", resolve_with(&["string"])),
                StepDefinition::new("b", validate_from("a")).after("a"),
            ],
        );

        let run = executor(transport)
            .run(&def, &params(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(run.step("a").unwrap().status, StepStatus::Failed);
        let b = run.step("b").unwrap();
        assert_eq!(b.status, StepStatus::SkippedDueToDependency);
        assert!(b.output.is_none());
        assert!(calls
            .lock()
            .unwrap()
            .iter()
            .all(|(_, call)| call.name == "map_proteins"));
        assert_eq!(run.status, RunStatus::Partial);
    }

    #[tokio::test]
    async fn test_optional_failure_keeps_run_succeeded() {
        let def = WorkflowDefinition::new(
            "wf",
            "",
            vec![
                StepDefinition::new("a", resolve_with(&["string"])),
                StepDefinition::new("c", missing_context()).optional(),
            ],
        );

        let run = executor(healthy())
            .run(&def, &params(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(run.status, RunStatus::Succeeded);
        assert_eq!(run.step("c").unwrap().status, StepStatus::Failed);
    }

    #[tokio::test]
    async fn test_biomarker_discovery_recommends_strong_candidates() {
        let def = catalog::builtin(catalog::BIOMARKER_DISCOVERY).unwrap();
        let params = WorkflowParameters::new(vec!["SNCA".into(), "PARK2".into(), "TH".into()]);

        let run = executor(healthy())
            .run(&def, &params, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(run.status, RunStatus::Succeeded);
        assert_eq!(run.steps.len(), 3);
        let validation = run.step("validate_interactions").unwrap().output.as_ref().unwrap();
        assert_eq!(validation["summary"]["convergent_count"], 2);
        assert_eq!(run.recommendations[0], "Strong candidates identified: SNCA, PARK2, TH");
    }

    #[tokio::test]
    async fn test_run_input_errors() {
        let exec = executor(healthy());
        let def = catalog::builtin(catalog::CROSS_DATABASE_VALIDATION).unwrap();
        let token = CancellationToken::new();

        let empty = WorkflowParameters::new(vec![]);
        assert!(matches!(
            exec.run(&def, &empty, &token).await,
            Err(OrchestratorError::ValidationInput(_))
        ));

        let bad_threshold = params().with_threshold(2.0);
        assert!(matches!(
            exec.run(&def, &bad_threshold, &token).await,
            Err(OrchestratorError::ValidationInput(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let def = catalog::builtin(catalog::PROTEIN_PROFILING).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = executor(healthy()).run(&def, &params(), &token).await;
        assert!(matches!(result, Err(OrchestratorError::Cancelled(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_mid_step() {
        let transport = ScriptedTransport::new().delay(
            "string",
            "map_proteins",
            Duration::from_secs(25),
            json!({"mapped_proteins": []}),
        );
        let def = WorkflowDefinition::new("wf", "", vec![StepDefinition::new("a", resolve_with(&["string"]))]);
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let result = executor(transport).run(&def, &params(), &token).await;
        assert!(matches!(result, Err(OrchestratorError::Cancelled(_))));
    }
}
