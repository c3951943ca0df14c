//! HTTP API handlers for xdb-orchestrator
//!
//! Inbound call-tool / read-resource surface, same contract the
//! orchestrator uses against its dependencies.

pub mod health;
pub mod resources;
pub mod tools;

pub use health::health_routes;
pub use resources::resource_routes;
pub use tools::tool_routes;
