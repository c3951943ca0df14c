//! Dependency access layer
//!
//! - `transport`: wire protocol to the dependency services (HTTP JSON)
//! - `service_client`: one call per request, deadline, decode to `ServiceOutcome`
//! - `response_cache`: TTL cache of successful responses, one fetch per key
//! - `profiles`: per-dependency tool shapes and confidence policy

pub mod profiles;
pub mod response_cache;
pub mod service_client;
pub mod transport;

pub use profiles::{profile_for, ServiceProfile};
pub use response_cache::{CacheKey, CacheStats, ResponseCache};
pub use service_client::{ServiceClient, ServiceTimeouts, ToolRequest};
pub use transport::{HttpTransport, ToolTransport, TransportError};
