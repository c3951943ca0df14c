//! Test helpers: fake dependency servers speaking call-tool / read-resource
//!
//! Each fake binds 127.0.0.1:0 inside the test's runtime and answers from a
//! canned table keyed by tool name or resource URI. Arguments are ignored.

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use xdb_common::protocol::{ResourceQuery, ToolCall, CALL_TOOL_PATH, READ_RESOURCE_PATH};
use xdb_common::{OrchestratorConfig, ServiceEndpoint};

/// Canned answer for one tool or resource
#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
    Text(&'static str),
    Slow(Duration, Value),
}

/// Fake dependency service
#[derive(Clone, Default)]
pub struct FakeService {
    tools: HashMap<String, Reply>,
    resources: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(mut self, name: &str, reply: Reply) -> Self {
        self.tools.insert(name.to_string(), reply);
        self
    }

    pub fn resource(mut self, uri: &str, reply: Reply) -> Self {
        self.resources.insert(uri.to_string(), reply);
        self
    }

    /// Tool names received, in arrival order
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    /// Serve on an ephemeral local port; returns the base URL
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route(CALL_TOOL_PATH, post(call_tool))
            .route(READ_RESOURCE_PATH, get(read_resource))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

async fn call_tool(State(fake): State<FakeService>, Json(call): Json<ToolCall>) -> Response {
    fake.calls.lock().unwrap().push(call.name.clone());
    match fake.tools.get(&call.name) {
        Some(reply) => render(reply.clone()).await,
        None => (StatusCode::NOT_FOUND, "unknown tool").into_response(),
    }
}

async fn read_resource(State(fake): State<FakeService>, Query(query): Query<ResourceQuery>) -> Response {
    match fake.resources.get(&query.uri) {
        Some(reply) => render(reply.clone()).await,
        None => (StatusCode::NOT_FOUND, "unknown resource").into_response(),
    }
}

async fn render(reply: Reply) -> Response {
    match reply {
        Reply::Json(value) => Json(value).into_response(),
        Reply::Status(status) => (status, "scripted failure").into_response(),
        Reply::Text(body) => (StatusCode::OK, body).into_response(),
        Reply::Slow(delay, value) => {
            tokio::time::sleep(delay).await;
            Json(value).into_response()
        }
    }
}

/// Base URL of a port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Configuration pointing each named service at a base URL
pub fn config_for(services: &[(&str, &str)]) -> OrchestratorConfig {
    let mut config = OrchestratorConfig::default();
    config.services = services
        .iter()
        .map(|(name, url)| (name.to_string(), ServiceEndpoint::new(*url, *url)))
        .collect();
    config
}

/// STRING fake: SNCA mapping, SNCA-TH (0.8) and SNCA-PARK2 (0.6) network,
/// dopaminergic markers resource
pub fn string_service() -> FakeService {
    FakeService::new()
        .tool(
            "map_proteins",
            Reply::Json(json!({
                "mapped_proteins": [{
                    "stringId": "9606.ENSP00000338345",
                    "preferredName": "SNCA",
                    "annotation": "Alpha-synuclein"
                }]
            })),
        )
        .tool(
            "get_network",
            Reply::Json(json!({
                "network_data": [
                    {"preferredName_A": "SNCA", "preferredName_B": "TH", "score": "0.8"},
                    {"preferredName_A": "SNCA", "preferredName_B": "PARK2", "score": 0.6}
                ]
            })),
        )
        .resource(
            "string://markers/dopaminergic",
            Reply::Json(json!({"core_proteins": ["TH", "SLC6A3", "SLC18A2", "DDC"]})),
        )
}

/// PRIDE fake: two projects and a dataset listing
pub fn pride_service() -> FakeService {
    FakeService::new()
        .tool(
            "search_projects",
            Reply::Json(json!({
                "projects": [{"accession": "PXD015293"}, {"accession": "PXD018792"}]
            })),
        )
        .resource(
            "research://parkinson/datasets/pride",
            Reply::Json(json!([{
                "text": "{\"proteomics_datasets\": {\"PXD015293\": {}, \"PXD018792\": {}}}"
            }])),
        )
}

/// BioGRID fake: TH-SNCA and PRKN-SNCA in the native keyed shape
pub fn biogrid_service() -> FakeService {
    FakeService::new().tool(
        "search_interactions",
        Reply::Json(json!({
            "103": {"OFFICIAL_SYMBOL_A": "TH", "OFFICIAL_SYMBOL_B": "SNCA"},
            "207": {"OFFICIAL_SYMBOL_A": "PRKN", "OFFICIAL_SYMBOL_B": "SNCA"}
        })),
    )
}

/// All three dependencies up with canned data
pub async fn healthy_config() -> OrchestratorConfig {
    let string = string_service().spawn().await;
    let pride = pride_service().spawn().await;
    let biogrid = biogrid_service().spawn().await;
    config_for(&[("string", &string), ("pride", &pride), ("biogrid", &biogrid)])
}

/// All three dependencies configured but unreachable
pub async fn unreachable_config() -> OrchestratorConfig {
    let string = closed_port_url().await;
    let pride = closed_port_url().await;
    let biogrid = closed_port_url().await;
    config_for(&[("string", &string), ("pride", &pride), ("biogrid", &biogrid)])
}
