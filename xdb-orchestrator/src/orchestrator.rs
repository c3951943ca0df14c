//! Orchestrator facade
//!
//! Single entry point behind the HTTP surface: tool invocation by name with
//! JSON arguments, and resource reads by URI. Owns the engines, the response
//! cache and the resource catalog.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use xdb_common::OrchestratorConfig;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::fusion::cross_validator::DEFAULT_THRESHOLD;
use crate::fusion::reference_network::{self, DEFAULT_NETWORK_THRESHOLD};
use crate::fusion::{CrossValidator, ProteinResolver};
use crate::resources::curated::{self, CandidateTier, DiscoveryMode};
use crate::resources::ResourceCatalog;
use crate::services::{CacheStats, ResponseCache, ServiceClient};
use crate::workflow::executor::ServiceDefaults;
use crate::workflow::{catalog, WorkflowExecutor, WorkflowParameters};

pub const TOOL_RESOLVE: &str = "resolve_protein_entity";
pub const TOOL_BATCH_RESOLVE: &str = "batch_resolve_proteins";
pub const TOOL_CROSS_VALIDATE: &str = "cross_validate_interactions";
pub const TOOL_EXECUTE_WORKFLOW: &str = "execute_workflow";
pub const TOOL_EXECUTE_PD_WORKFLOW: &str = "execute_pd_workflow";
pub const TOOL_BIOMARKER_CANDIDATES: &str = "get_biomarker_candidates";
pub const TOOL_LIST_WORKFLOWS: &str = "list_workflows";
pub const TOOL_REFERENCE_NETWORK: &str = "build_dopaminergic_reference_network_tool";

/// Tools exposed by `invoke_tool`
pub const TOOLS: &[&str] = &[
    TOOL_RESOLVE,
    TOOL_BATCH_RESOLVE,
    TOOL_CROSS_VALIDATE,
    TOOL_EXECUTE_WORKFLOW,
    TOOL_EXECUTE_PD_WORKFLOW,
    TOOL_BIOMARKER_CANDIDATES,
    TOOL_LIST_WORKFLOWS,
    TOOL_REFERENCE_NETWORK,
];

#[derive(Debug, Deserialize)]
struct ResolveArgs {
    identifier: String,
    #[serde(default)]
    target_databases: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct BatchResolveArgs {
    identifiers: Vec<String>,
    #[serde(default)]
    target_databases: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CrossValidateArgs {
    proteins: Vec<String>,
    #[serde(default)]
    databases: Option<Vec<String>>,
    #[serde(default)]
    confidence_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WorkflowArgs {
    #[serde(default, alias = "workflow_type")]
    workflow: Option<String>,
    #[serde(default)]
    target_proteins: Option<Vec<String>>,
    #[serde(default)]
    confidence_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ReferenceNetworkArgs {
    #[serde(default)]
    discovery_mode: Option<String>,
    #[serde(default)]
    confidence_threshold: Option<f64>,
    #[serde(default)]
    include_indirect: Option<bool>,
    #[serde(default)]
    databases: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CandidateArgs {
    #[serde(default)]
    disease: Option<String>,
    #[serde(default)]
    confidence_level: Option<String>,
}

pub struct Orchestrator {
    client: Arc<ServiceClient>,
    cache: Option<Arc<ResponseCache>>,
    resolver: ProteinResolver,
    validator: CrossValidator,
    resources: Arc<ResourceCatalog>,
    executor: WorkflowExecutor,
    defaults: ServiceDefaults,
}

impl Orchestrator {
    /// Assemble the engines over a service client and optional cache
    pub fn new(client: Arc<ServiceClient>, cache: Option<Arc<ResponseCache>>) -> Self {
        let resolver = ProteinResolver::new(Arc::clone(&client), cache.clone());
        let validator = CrossValidator::new(Arc::clone(&client), cache.clone());
        let defaults = ServiceDefaults::for_client(&client);
        let resources = Arc::new(
            ResourceCatalog::new(Arc::clone(&client)).with_resolver(resolver.clone(), defaults.resolution.clone()),
        );
        let executor = WorkflowExecutor::new(
            resolver.clone(),
            validator.clone(),
            Arc::clone(&resources),
            defaults.clone(),
        );

        Self {
            client,
            cache,
            resolver,
            validator,
            resources,
            executor,
            defaults,
        }
    }

    /// Build from configuration (HTTP transport, cache unless capacity is 0)
    pub fn from_config(config: &OrchestratorConfig) -> OrchestratorResult<Self> {
        let client = Arc::new(ServiceClient::from_config(config)?);
        let cache = (config.cache_capacity > 0)
            .then(|| Arc::new(ResponseCache::new(config.cache_ttl(), config.cache_capacity)));
        Ok(Self::new(client, cache))
    }

    pub fn service_names(&self) -> Vec<String> {
        self.client.service_names()
    }

    pub async fn cache_stats(&self) -> Option<CacheStats> {
        match &self.cache {
            Some(cache) => Some(cache.stats().await),
            None => None,
        }
    }

    /// Invoke a tool by name; cancelled when `cancel` fires
    pub async fn invoke_tool(&self, name: &str, arguments: Value, cancel: &CancellationToken) -> OrchestratorResult<Value> {
        info!(tool = name, "Tool invoked");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(OrchestratorError::Cancelled(format!("tool '{}' cancelled", name))),
            result = self.dispatch(name, arguments, cancel) => result,
        }
    }

    /// Read a resource by URI
    pub async fn read_resource(&self, uri: &str) -> OrchestratorResult<Value> {
        debug!(uri, "Resource read");
        self.resources.read(uri).await
    }

    async fn dispatch(&self, name: &str, arguments: Value, cancel: &CancellationToken) -> OrchestratorResult<Value> {
        match name {
            TOOL_RESOLVE => {
                let args: ResolveArgs = parse_args(name, arguments)?;
                let services = args.target_databases.unwrap_or_else(|| self.defaults.resolution.clone());
                let result = self.resolver.resolve(&args.identifier, &services).await?;
                Ok(serde_json::to_value(result)?)
            }
            TOOL_BATCH_RESOLVE => {
                let args: BatchResolveArgs = parse_args(name, arguments)?;
                let services = args.target_databases.unwrap_or_else(|| self.defaults.resolution.clone());
                let results = self.resolver.resolve_many(&args.identifiers, &services).await?;
                let resolved = results.iter().filter(|r| !r.resolved_services().is_empty()).count();
                Ok(json!({
                    "results": results,
                    "total": results.len(),
                    "resolved_count": resolved,
                    "success_rate": resolved as f64 / results.len() as f64,
                }))
            }
            TOOL_CROSS_VALIDATE => {
                let args: CrossValidateArgs = parse_args(name, arguments)?;
                let services = args.databases.unwrap_or_else(|| self.defaults.validation.clone());
                let threshold = args.confidence_threshold.unwrap_or(DEFAULT_THRESHOLD);
                let result = self.validator.validate(&args.proteins, &services, threshold).await?;
                Ok(serde_json::to_value(result)?)
            }
            TOOL_EXECUTE_WORKFLOW | TOOL_EXECUTE_PD_WORKFLOW => {
                let args: WorkflowArgs = parse_args(name, arguments)?;
                let workflow = args.workflow.as_deref().unwrap_or(catalog::DEFAULT_WORKFLOW);
                let definition = catalog::builtin(workflow).ok_or_else(|| {
                    OrchestratorError::ValidationInput(format!(
                        "unknown workflow '{}' (available: {})",
                        workflow,
                        catalog::WORKFLOW_NAMES.join(", ")
                    ))
                })?;

                let proteins = args
                    .target_proteins
                    .unwrap_or_else(|| catalog::DEFAULT_TARGETS.iter().map(|p| p.to_string()).collect());
                let params = WorkflowParameters::new(proteins)
                    .with_threshold(args.confidence_threshold.unwrap_or(DEFAULT_THRESHOLD));

                let run = self.executor.run(&definition, &params, cancel).await?;
                Ok(serde_json::to_value(run)?)
            }
            TOOL_BIOMARKER_CANDIDATES => {
                let args: CandidateArgs = parse_args(name, arguments)?;
                let tier = CandidateTier::parse(args.confidence_level.as_deref().unwrap_or("high"))?;
                curated::candidates_document(args.disease.as_deref().unwrap_or("parkinson"), tier)
            }
            TOOL_LIST_WORKFLOWS => Ok(json!({ "workflows": catalog::list() })),
            TOOL_REFERENCE_NETWORK => {
                let args: ReferenceNetworkArgs = parse_args(name, arguments)?;
                let mode = DiscoveryMode::parse(args.discovery_mode.as_deref().unwrap_or("comprehensive"))?;
                let services = args.databases.unwrap_or_else(|| self.defaults.validation.clone());
                let network = reference_network::build(
                    &self.validator,
                    mode,
                    args.include_indirect.unwrap_or(true),
                    &services,
                    args.confidence_threshold.unwrap_or(DEFAULT_NETWORK_THRESHOLD),
                )
                .await?;
                Ok(serde_json::to_value(network)?)
            }
            other => Err(OrchestratorError::UnknownTool(other.to_string())),
        }
    }
}

/// Decode tool arguments; absent arguments read as `{}`
fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> OrchestratorResult<T> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments)
        .map_err(|e| OrchestratorError::ValidationInput(format!("invalid arguments for '{}': {}", tool, e)))
}
