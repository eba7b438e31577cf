//! Redeploy Runner
//!
//! Restarts running tasks after a new container image is pushed, so the
//! orchestrator relaunches them with the fresh image.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Event intake: Decode the push event from stdin and apply the subscription filter
//! - Workflow: Fleet and per-cluster state machines run by the engine
//! - Services: One workflow execution per accepted event
//!
//! The report of a completed execution is written to stdout as JSON.

mod config;
mod context;
mod event;
mod execution;
mod service;
mod workflow;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::event::EventFilter;
use crate::service::{RedeployService, StandardRedeployService};
use redeploy_client::OrchestratorClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redeploy_runner=info,redeploy_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Redeploy Runner");

    let config = load_config()?;
    info!(
        "Loaded configuration: orchestrator_url={}, repositories={:?}, max_concurrency={}",
        config.orchestrator_url, config.repository_names, config.max_concurrency
    );

    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("Failed to read event from stdin")?;

    let filter = EventFilter::new(config.repository_names.clone());
    let event = match filter.decode(&raw) {
        Ok(event) => event,
        Err(e) if e.is_filtered() => {
            info!("Ignoring event: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e).context("Invalid event"),
    };

    let client = Arc::new(OrchestratorClient::new(config.orchestrator_url.clone()));
    let service = StandardRedeployService::new(client, &config)?;

    let report = match service.handle(event).await {
        Ok(report) => report,
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize report")?
    );
    Ok(())
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<Config> {
    match Config::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(e) => {
            let ignored = config::ignored_overrides(|name| std::env::var_os(name).is_some());
            if ignored.is_empty() {
                info!("{}, using defaults", e);
            } else {
                warn!("{}, using defaults and ignoring {}", e, ignored.join(", "));
            }
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}
