//! # XDB Common Library
//!
//! Shared code for the cross-database orchestrator and its tooling:
//! - Common error type
//! - Configuration loading (TOML + environment)
//! - Call-tool / read-resource wire types used by both the inbound
//!   HTTP surface and the outbound dependency client

pub mod config;
pub mod error;
pub mod protocol;

pub use config::{DeploymentMode, OrchestratorConfig, ServiceEndpoint};
pub use error::{Error, Result};
