//! xdb-orchestrator - Cross-Database Protein Research Orchestrator
//!
//! **Module Identity:**
//! - Name: xdb-orchestrator
//! - Port: 8000 (127.0.0.1 locally, 0.0.0.0 in container mode)
//!
//! Resolves protein entities, cross-validates interactions and runs research
//! workflows over the STRING, PRIDE and BioGRID services.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xdb_common::{DeploymentMode, OrchestratorConfig};

use xdb_orchestrator::{build_router, AppState, Orchestrator};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "xdb-orchestrator")]
#[command(about = "Cross-database protein research orchestrator")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "XDB_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address (host:port), overrides configuration
    #[arg(short, long)]
    bind: Option<String>,

    /// Deployment mode (local or container), overrides configuration
    #[arg(long)]
    deployment_mode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xdb_orchestrator=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(
        "Starting xdb-orchestrator v{} ({}, built {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Priority: command line > environment > TOML file > defaults
    let mut config = OrchestratorConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(mode) = args.deployment_mode.as_deref() {
        config.deployment_mode = DeploymentMode::parse(mode)?;
    }
    if let Some(bind) = args.bind {
        config.bind_address = Some(bind);
    }

    info!(mode = ?config.deployment_mode, "Deployment mode");
    for (service, url) in config.resolved_urls() {
        info!(service = %service, url = %url, "Dependency");
    }

    let orchestrator = Orchestrator::from_config(&config).context("Failed to initialize orchestrator")?;
    let state = AppState::new(Arc::new(orchestrator), config.request_timeout());
    let shutdown = state.shutdown.clone();
    let app = build_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    info!("xdb-orchestrator stopped");
    Ok(())
}
