//! Configuration loading and dependency endpoint resolution
//!
//! Resolution priority (highest first):
//! 1. Command-line arguments (applied by the binary)
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing TOML file is not an error: a warning is logged and the
//! compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Default per-call timeout for dependency tool calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default timeout for interaction-network calls (larger payloads)
pub const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 60;

/// Default response cache TTL
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

/// Default response cache capacity (entries)
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Default superordinate timeout for one inbound request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Port the orchestrator listens on in both deployment modes
pub const DEFAULT_PORT: u16 = 8000;

/// Deployment mode selecting which URL set is used for dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Dependencies run as local processes on distinct ports
    #[default]
    Local,
    /// Dependencies run as containers addressed by service name
    Container,
}

impl DeploymentMode {
    /// Parse a mode name ("local" / "container", case-insensitive)
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(DeploymentMode::Local),
            "container" | "docker" => Ok(DeploymentMode::Container),
            other => Err(Error::Config(format!(
                "Unknown deployment mode '{}' (expected 'local' or 'container')",
                other
            ))),
        }
    }
}

/// Connection settings for one remote dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Base URL when running as a local process
    pub local_url: String,
    /// Base URL when running inside the container network
    pub container_url: String,
    /// Per-call timeout for ordinary tool calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-call timeout for interaction-network calls
    #[serde(default = "default_network_timeout_secs")]
    pub network_timeout_secs: u64,
    /// Static credential forwarded as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Explicit URL from the environment; wins over both URL sets
    #[serde(skip)]
    pub url_override: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_network_timeout_secs() -> u64 {
    DEFAULT_NETWORK_TIMEOUT_SECS
}

impl ServiceEndpoint {
    /// Endpoint with default timeouts and no credential
    pub fn new(local_url: impl Into<String>, container_url: impl Into<String>) -> Self {
        Self {
            local_url: local_url.into(),
            container_url: container_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            network_timeout_secs: DEFAULT_NETWORK_TIMEOUT_SECS,
            credential: None,
            url_override: None,
        }
    }

    /// Base URL for the given deployment mode, without a trailing slash
    pub fn base_url(&self, mode: DeploymentMode) -> &str {
        let url = match (&self.url_override, mode) {
            (Some(url), _) => url.as_str(),
            (None, DeploymentMode::Local) => self.local_url.as_str(),
            (None, DeploymentMode::Container) => self.container_url.as_str(),
        };
        url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network_timeout_secs)
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Selects the dependency URL set
    pub deployment_mode: DeploymentMode,
    /// Listen address; derived from the deployment mode when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    /// Response cache TTL in hours
    pub cache_ttl_hours: u64,
    /// Maximum number of cached responses (0 disables the cache)
    pub cache_capacity: usize,
    /// Superordinate timeout for one inbound request
    pub request_timeout_secs: u64,
    /// Dependencies keyed by service name
    pub services: BTreeMap<String, ServiceEndpoint>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        let mut services = BTreeMap::new();
        services.insert(
            "string".to_string(),
            ServiceEndpoint::new("http://localhost:8001", "http://string-mcp:8000"),
        );
        services.insert(
            "pride".to_string(),
            ServiceEndpoint::new("http://localhost:8002", "http://pride-mcp:8000"),
        );
        services.insert(
            "biogrid".to_string(),
            ServiceEndpoint::new("http://localhost:8003", "http://biogrid-mcp:8000"),
        );

        Self {
            deployment_mode: DeploymentMode::Local,
            bind_address: None,
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            services,
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from TOML (explicit path or platform default)
    /// and apply environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            // An explicitly requested file must exist
            Some(path) => Self::from_toml_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_toml_file(&path)?,
                Some(path) => {
                    warn!(
                        "Config file not found at {}, using compiled defaults",
                        path.display()
                    );
                    Self::default()
                }
                None => {
                    warn!("Could not determine config directory, using compiled defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text. Services named in the file replace the defaults of
    /// the same name; unnamed defaults are kept.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parsed: OrchestratorConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

        let mut services = Self::default().services;
        services.extend(parsed.services);

        let config = Self { services, ..parsed };
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Recognised keys:
    /// - `DOCKER_MODE=true` or `XDB_DEPLOYMENT_MODE=<mode>`
    /// - `<SERVICE>_MCP_URL` per configured service (e.g. `STRING_MCP_URL`)
    /// - `BIOGRID_API_KEY` credential for the BioGRID dependency
    /// - `XDB_BIND_ADDRESS`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("XDB_DEPLOYMENT_MODE") {
            self.deployment_mode = DeploymentMode::parse(&mode)?;
        } else if lookup("DOCKER_MODE").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            self.deployment_mode = DeploymentMode::Container;
        }

        for (name, endpoint) in self.services.iter_mut() {
            let key = format!("{}_MCP_URL", name.to_ascii_uppercase());
            if let Some(url) = lookup(&key).filter(|u| !u.trim().is_empty()) {
                info!(service = %name, "Dependency URL overridden by {}", key);
                endpoint.url_override = Some(url);
            }
        }

        if let Some(key) = lookup("BIOGRID_API_KEY").filter(|k| !k.trim().is_empty()) {
            match self.services.get_mut("biogrid") {
                Some(endpoint) => endpoint.credential = Some(key),
                None => warn!("BIOGRID_API_KEY set but no 'biogrid' service is configured"),
            }
        }

        if let Some(addr) = lookup("XDB_BIND_ADDRESS") {
            self.bind_address = Some(addr);
        }

        self.validate()
    }

    /// Listen address: explicit value or mode-dependent default
    pub fn bind_address(&self) -> String {
        match (&self.bind_address, self.deployment_mode) {
            (Some(addr), _) => addr.clone(),
            (None, DeploymentMode::Local) => format!("127.0.0.1:{}", DEFAULT_PORT),
            (None, DeploymentMode::Container) => format!("0.0.0.0:{}", DEFAULT_PORT),
        }
    }

    pub fn endpoint(&self, service: &str) -> Option<&ServiceEndpoint> {
        self.services.get(service)
    }

    /// Resolved base URL per configured service for the active mode
    pub fn resolved_urls(&self) -> BTreeMap<String, String> {
        self.services
            .iter()
            .map(|(name, ep)| (name.clone(), ep.base_url(self.deployment_mode).to_string()))
            .collect()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(3600))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        for (name, ep) in &self.services {
            if ep.timeout_secs == 0 || ep.network_timeout_secs == 0 {
                return Err(Error::Config(format!(
                    "Service '{}' timeout must be greater than zero",
                    name
                )));
            }
            let url = ep.base_url(self.deployment_mode);
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "Service '{}' URL must be http(s): {}",
                    name, url
                )));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Platform config file location: `<config_dir>/xdb/orchestrator.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("xdb").join("orchestrator.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_cover_three_dependencies() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.services.len(), 3);
        assert_eq!(
            config.endpoint("string").unwrap().base_url(DeploymentMode::Local),
            "http://localhost:8001"
        );
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_cache_ttl_saturates() {
        let config = OrchestratorConfig {
            cache_ttl_hours: u64::MAX,
            ..OrchestratorConfig::default()
        };
        assert_eq!(config.cache_ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_docker_mode_selects_container_urls() {
        let mut config = OrchestratorConfig::default();
        config
            .apply_overrides(lookup_from(&[("DOCKER_MODE", "true")]))
            .unwrap();

        assert_eq!(config.deployment_mode, DeploymentMode::Container);
        assert_eq!(
            config.resolved_urls().get("pride").map(String::as_str),
            Some("http://pride-mcp:8000")
        );
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn test_url_override_wins_in_any_mode() {
        let mut config = OrchestratorConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("XDB_DEPLOYMENT_MODE", "container"),
                ("BIOGRID_MCP_URL", "http://10.0.0.5:9003/"),
            ]))
            .unwrap();

        let biogrid = config.endpoint("biogrid").unwrap();
        assert_eq!(biogrid.base_url(DeploymentMode::Container), "http://10.0.0.5:9003");
        assert_eq!(biogrid.base_url(DeploymentMode::Local), "http://10.0.0.5:9003");
    }

    #[test]
    fn test_credential_forwarded_to_biogrid_only() {
        let mut config = OrchestratorConfig::default();
        config
            .apply_overrides(lookup_from(&[("BIOGRID_API_KEY", "secret-key")]))
            .unwrap();

        assert_eq!(
            config.endpoint("biogrid").unwrap().credential.as_deref(),
            Some("secret-key")
        );
        assert!(config.endpoint("string").unwrap().credential.is_none());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let mut config = OrchestratorConfig::default();
        let result = config.apply_overrides(lookup_from(&[("XDB_DEPLOYMENT_MODE", "cloud")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_toml_merges_with_default_services() {
        let config = OrchestratorConfig::from_toml_str(
            r#"
            deployment_mode = "container"
            cache_ttl_hours = 2

            [services.string]
            local_url = "http://localhost:9001"
            container_url = "http://string:9000"
            timeout_secs = 45
            "#,
        )
        .unwrap();

        assert_eq!(config.deployment_mode, DeploymentMode::Container);
        assert_eq!(config.cache_ttl(), Duration::from_secs(7200));
        let string = config.endpoint("string").unwrap();
        assert_eq!(string.base_url(DeploymentMode::Container), "http://string:9000");
        assert_eq!(string.timeout(), Duration::from_secs(45));
        assert_eq!(string.network_timeout(), Duration::from_secs(60));
        assert!(config.endpoint("pride").is_some(), "defaults kept for unnamed services");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = OrchestratorConfig::from_toml_str(
            r#"
            [services.pride]
            local_url = "http://localhost:8002"
            container_url = "http://pride-mcp:8000"
            timeout_secs = 0
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
