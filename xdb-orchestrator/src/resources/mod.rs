//! Resource Catalog
//!
//! Resolves resource URIs:
//! - `biomarkers://parkinson/{high,moderate}`: curated candidate sets
//! - `workflow://<template>`: workflow templates
//! - `research://parkinson/overview`: curated overview, enriched best-effort
//!   with live PRIDE datasets and STRING dopaminergic markers
//! - `protein://resolved/{identifier}`: cross-service resolution with
//!   aliases, served through the response cache
//! - `<service>://...` for a configured dependency: forwarded to it

pub mod curated;

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};
use xdb_common::protocol::{split_uri, unwrap_resource_contents};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::fusion::ProteinResolver;
use crate::services::ServiceClient;
use crate::types::ServiceOutcome;
use curated::CandidateTier;

pub const OVERVIEW_URI: &str = "research://parkinson/overview";
pub const PRIDE_DATASETS_URI: &str = "research://parkinson/datasets/pride";
pub const STRING_MARKERS_URI: &str = "string://markers/dopaminergic";
pub const RESOLVED_PREFIX: &str = "resolved/";

/// Static URIs served by the catalog itself
pub const STATIC_URIS: &[&str] = &[
    "biomarkers://parkinson/high",
    "biomarkers://parkinson/moderate",
    "workflow://pd-biomarker-discovery",
    "workflow://cross-database-validation",
    OVERVIEW_URI,
];

/// URI → resource document
pub struct ResourceCatalog {
    client: Arc<ServiceClient>,
    resolver: Option<ProteinResolver>,
    resolution_services: Vec<String>,
}

impl ResourceCatalog {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            client,
            resolver: None,
            resolution_services: Vec::new(),
        }
    }

    /// Serve `protein://resolved/...` by resolving against `services`
    pub fn with_resolver(mut self, resolver: ProteinResolver, services: Vec<String>) -> Self {
        self.resolver = Some(resolver);
        self.resolution_services = services;
        self
    }

    /// Read a resource by URI
    pub async fn read(&self, uri: &str) -> OrchestratorResult<Value> {
        let uri = uri.trim();
        let (scheme, path) =
            split_uri(uri).ok_or_else(|| OrchestratorError::UnknownResource(uri.to_string()))?;

        match scheme {
            "biomarkers" => {
                let (disease, tier) = path
                    .split_once('/')
                    .ok_or_else(|| OrchestratorError::UnknownResource(uri.to_string()))?;
                let tier = CandidateTier::parse(tier)
                    .map_err(|_| OrchestratorError::UnknownResource(uri.to_string()))?;
                curated::candidates_document(disease, tier)
                    .map_err(|_| OrchestratorError::UnknownResource(uri.to_string()))
            }
            "workflow" => {
                curated::workflow_template(path).ok_or_else(|| OrchestratorError::UnknownResource(uri.to_string()))
            }
            "research" if uri == OVERVIEW_URI => Ok(self.research_overview().await),
            "protein" => match (path.strip_prefix(RESOLVED_PREFIX), &self.resolver) {
                (Some(identifier), Some(resolver)) if !identifier.trim().is_empty() && !identifier.contains('/') => {
                    self.resolved_protein(resolver, uri, identifier).await
                }
                _ => Err(OrchestratorError::UnknownResource(uri.to_string())),
            },
            service if self.client.is_configured(service) => Ok(self.forward(service, uri).await),
            _ => Err(OrchestratorError::UnknownResource(uri.to_string())),
        }
    }

    /// Curated overview with live enrichment; never fails
    pub async fn research_overview(&self) -> Value {
        let (pride, string) = tokio::join!(
            self.fetch_document("pride", PRIDE_DATASETS_URI),
            self.fetch_document("string", STRING_MARKERS_URI),
        );

        let mut overview = curated::research_overview();
        let mut status_notes = Vec::new();

        let datasets: Vec<Value> = match pride.and_then(|doc| pride_dataset_ids(&doc)) {
            Ok(ids) => ids.into_iter().map(Value::String).collect(),
            Err(reason) => {
                warn!(reason = %reason, "PRIDE datasets unavailable, using curated fallback");
                status_notes.push(format!("PRIDE service unavailable: {}", reason));
                curated::FALLBACK_PRIDE_DATASETS.iter().map(|id| json!(id)).collect()
            }
        };
        overview["datasets"]["total_datasets"] = json!(datasets.len());
        overview["datasets"]["pride_proteomics"] = Value::Array(datasets);

        match string {
            Ok(doc) => match doc.get("core_proteins") {
                Some(core) => overview["biomarkers"]["string_validated"] = core.clone(),
                None => debug!("STRING marker resource has no core_proteins"),
            },
            Err(reason) => status_notes.push(format!("STRING service unavailable: {}", reason)),
        }

        if !status_notes.is_empty() {
            overview["service_status"] = json!(status_notes.join("; "));
        }
        overview
    }

    /// Resolution document for one identifier; repeat reads hit the cache
    async fn resolved_protein(&self, resolver: &ProteinResolver, uri: &str, identifier: &str) -> OrchestratorResult<Value> {
        let result = resolver.resolve(identifier, &self.resolution_services).await?;
        let mut document = serde_json::to_value(&result)?;
        document["uri"] = json!(uri);
        Ok(document)
    }

    async fn fetch_document(&self, service: &str, uri: &str) -> Result<Value, String> {
        let raw = self
            .client
            .read_resource(service, uri)
            .await
            .map_err(|e| e.to_string())?;
        unwrap_resource_contents(raw)
    }

    /// Pass a dependency resource through, wrapping its outcome
    async fn forward(&self, service: &str, uri: &str) -> Value {
        let outcome: ServiceOutcome = match self.client.read_resource(service, uri).await {
            Ok(raw) => match unwrap_resource_contents(raw) {
                Ok(doc) => ServiceOutcome::success(doc, 1.0),
                Err(reason) => ServiceOutcome::Malformed { reason },
            },
            Err(e) => {
                warn!(service, uri, error = %e, "Dependency resource read failed");
                e.into_outcome()
            }
        };
        json!({ "uri": uri, "service": service, "result": outcome })
    }
}

/// Dataset accessions from PRIDE's curated dataset resource
fn pride_dataset_ids(doc: &Value) -> Result<Vec<String>, String> {
    let datasets = doc
        .get("proteomics_datasets")
        .and_then(Value::as_object)
        .ok_or_else(|| "resource has no 'proteomics_datasets' map".to_string())?;
    if datasets.is_empty() {
        return Err("resource lists no datasets".to_string());
    }
    Ok(datasets.keys().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ResponseCache, ServiceTimeouts, TransportError};
    use crate::test_support::ScriptedTransport;
    use std::time::Duration;

    fn catalog(transport: ScriptedTransport) -> ResourceCatalog {
        let services = ["string", "pride", "biogrid"]
            .into_iter()
            .map(|name| (name.to_string(), ServiceTimeouts::default()))
            .collect();
        ResourceCatalog::new(Arc::new(ServiceClient::new(Arc::new(transport), services)))
    }

    #[tokio::test]
    async fn test_static_resources() {
        let catalog = catalog(ScriptedTransport::new());
        for uri in STATIC_URIS {
            assert!(catalog.read(uri).await.is_ok(), "{} should be served", uri);
        }

        let high = catalog.read("biomarkers://parkinson/high").await.unwrap();
        assert_eq!(high["total_candidates"], 3);

        let template = catalog.read("workflow://cross-database-validation").await.unwrap();
        assert_eq!(template["confidence_thresholds"]["minimum_databases"], 2);
    }

    #[tokio::test]
    async fn test_unknown_resources() {
        let catalog = catalog(ScriptedTransport::new());
        for uri in [
            "biomarkers://alzheimer/high",
            "biomarkers://parkinson/low",
            "workflow://clinical-translation",
            "research://parkinson/other",
            "uniprot://P37840",
            "protein://resolved/SNCA",
            "not a uri",
        ] {
            assert!(
                matches!(catalog.read(uri).await, Err(OrchestratorError::UnknownResource(_))),
                "{} should be unknown",
                uri
            );
        }
    }

    #[tokio::test]
    async fn test_overview_enriched_from_dependencies() {
        let transport = ScriptedTransport::new()
            .resource(
                "pride",
                PRIDE_DATASETS_URI,
                Ok(json!([{ "text": "{\"proteomics_datasets\": {\"PXD000001\": {}, \"PXD000002\": {}}}" }])),
            )
            .resource("string", STRING_MARKERS_URI, Ok(json!({ "core_proteins": ["TH", "SLC6A3"] })));
        let overview = catalog(transport).read(OVERVIEW_URI).await.unwrap();

        assert_eq!(overview["datasets"]["pride_proteomics"], json!(["PXD000001", "PXD000002"]));
        assert_eq!(overview["datasets"]["total_datasets"], 2);
        assert_eq!(overview["biomarkers"]["string_validated"], json!(["TH", "SLC6A3"]));
        assert!(overview.get("service_status").is_none());
    }

    #[tokio::test]
    async fn test_overview_falls_back_when_pride_down() {
        let transport = ScriptedTransport::new()
            .resource("string", STRING_MARKERS_URI, Ok(json!({ "core_proteins": ["TH"] })));
        let overview = catalog(transport).read(OVERVIEW_URI).await.unwrap();

        assert_eq!(overview["datasets"]["total_datasets"], 5);
        assert_eq!(overview["datasets"]["pride_proteomics"][0], "PXD015293");
        assert!(overview["service_status"].as_str().unwrap().starts_with("PRIDE service unavailable"));
    }

    #[tokio::test]
    async fn test_dependency_resource_forwarded() {
        let transport = ScriptedTransport::new()
            .resource("string", "string://info/version", Ok(json!({ "version": "12.0" })))
            .resource("biogrid", "biogrid://info", Err(TransportError::Timeout));
        let catalog = catalog(transport);

        let ok = catalog.read("string://info/version").await.unwrap();
        assert_eq!(ok["result"]["outcome"], "success");
        assert_eq!(ok["result"]["payload"]["version"], "12.0");

        let down = catalog.read("biogrid://info").await.unwrap();
        assert_eq!(down["result"]["outcome"], "timeout");
    }

    fn resolving_catalog(transport: ScriptedTransport) -> (ResourceCatalog, Arc<ResponseCache>) {
        let services = ["string", "pride", "biogrid"]
            .into_iter()
            .map(|name| (name.to_string(), ServiceTimeouts::default()))
            .collect();
        let client = Arc::new(ServiceClient::new(Arc::new(transport), services));
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60), 16));
        let resolver = ProteinResolver::new(Arc::clone(&client), Some(Arc::clone(&cache)));
        let catalog = ResourceCatalog::new(client)
            .with_resolver(resolver, vec!["string".to_string(), "pride".to_string()]);
        (catalog, cache)
    }

    #[tokio::test]
    async fn test_resolved_protein_resource() {
        let transport = ScriptedTransport::new()
            .respond(
                "string",
                "map_proteins",
                json!({"mapped_proteins": [{"stringId": "9606.ENSP00000338345", "preferredName": "PRKN"}]}),
            )
            .respond("pride", "search_projects", json!({"projects": [{"accession": "PXD015293"}]}));
        let calls = transport.call_log();
        let (catalog, cache) = resolving_catalog(transport);

        let doc = catalog.read("protein://resolved/PARK2").await.unwrap();
        assert_eq!(doc["uri"], "protein://resolved/PARK2");
        assert_eq!(doc["identifier"], "PARK2");
        assert_eq!(doc["canonical_symbol"], "PRKN");
        assert_eq!(doc["aliases"], json!(["PRKN", "PARKIN"]));
        assert_eq!(doc["status"], "resolved");

        let again = catalog.read("protein://resolved/PARK2").await.unwrap();
        assert_eq!(again, doc);
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(cache.stats().await.hits, 2);
    }

    #[tokio::test]
    async fn test_resolved_protein_bad_paths() {
        let (catalog, _) = resolving_catalog(ScriptedTransport::new());
        for uri in [
            "protein://resolved/",
            "protein://resolved/SNCA/interactions",
            "protein://SNCA",
        ] {
            assert!(
                matches!(catalog.read(uri).await, Err(OrchestratorError::UnknownResource(_))),
                "{} should be unknown",
                uri
            );
        }
    }
}
