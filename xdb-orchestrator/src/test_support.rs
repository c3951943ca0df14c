//! Scripted transport for unit tests

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use xdb_common::protocol::ToolCall;

use crate::services::transport::{ToolTransport, TransportError};

type Responder = Arc<dyn Fn(&Value) -> Result<Value, TransportError> + Send + Sync>;

#[derive(Clone)]
struct Script {
    delay: Option<Duration>,
    respond: Responder,
}

/// Transport answering from per-(service, tool) scripts
#[derive(Default)]
pub struct ScriptedTransport {
    tools: HashMap<(String, String), Script>,
    resources: HashMap<(String, String), Result<Value, TransportError>>,
    calls: Arc<Mutex<Vec<(String, ToolCall)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, service: &str, tool: &str, value: Value) -> Self {
        self.respond_with(service, tool, move |_| Ok(value.clone()))
    }

    pub fn fail(self, service: &str, tool: &str, err: TransportError) -> Self {
        self.respond_with(service, tool, move |_| Err(err.clone()))
    }

    pub fn delay(mut self, service: &str, tool: &str, delay: Duration, value: Value) -> Self {
        self.tools.insert(
            (service.to_string(), tool.to_string()),
            Script {
                delay: Some(delay),
                respond: Arc::new(move |_| Ok(value.clone())),
            },
        );
        self
    }

    /// Answer based on the call arguments
    pub fn respond_with<F>(mut self, service: &str, tool: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        self.tools.insert(
            (service.to_string(), tool.to_string()),
            Script {
                delay: None,
                respond: Arc::new(f),
            },
        );
        self
    }

    pub fn resource(mut self, service: &str, uri: &str, result: Result<Value, TransportError>) -> Self {
        self.resources
            .insert((service.to_string(), uri.to_string()), result);
        self
    }

    /// Shared log of every tool call received
    pub fn call_log(&self) -> Arc<Mutex<Vec<(String, ToolCall)>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ToolTransport for ScriptedTransport {
    async fn call_tool(&self, service: &str, call: &ToolCall) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((service.to_string(), call.clone()));

        let script = self
            .tools
            .get(&(service.to_string(), call.name.clone()))
            .cloned()
            .ok_or_else(|| TransportError::Unavailable(format!("no script for {}.{}", service, call.name)))?;

        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }
        (script.respond)(&call.arguments)
    }

    async fn read_resource(&self, service: &str, uri: &str) -> Result<Value, TransportError> {
        self.resources
            .get(&(service.to_string(), uri.to_string()))
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Unavailable(format!("no resource {}", uri))))
    }
}
