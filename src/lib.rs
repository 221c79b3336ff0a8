pub mod cli;
pub mod core;
pub mod handler;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{Environment, InvocationEvent};
use crate::handler::{IngestionHandler, InvocationResult};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Builds the process-wide provider and store from config.
pub fn build_handler(config: &AppConfig) -> Result<IngestionHandler> {
    let frankfurter = &config.providers.frankfurter;
    let provider = providers::FrankfurterProvider::new(
        &frankfurter.base_url,
        Duration::from_secs(frankfurter.timeout_secs),
    )?;
    let store = store::build_store(&config.store)?;
    Ok(IngestionHandler::new(Arc::new(provider), store))
}

pub async fn run_invocation(
    config_path: Option<&str>,
    event: &InvocationEvent,
    env: &Environment,
) -> Result<InvocationResult> {
    info!("FX ingestion starting...");

    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    let handler = build_handler(&config)?;
    handler.handle(event, env).await
}
