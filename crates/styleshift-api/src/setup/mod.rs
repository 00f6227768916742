//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from
//! main.rs for better organization and testability.

pub mod routes;
pub mod server;
pub mod telemetry;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use styleshift_core::Config;
use styleshift_gateway::GatewayClient;
use styleshift_storage::Storage;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first so validation warnings are visible
    telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Validate configuration - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    // Setup storage
    let storage = styleshift_storage::create_storage(&config)
        .await
        .context("Failed to create storage backend")?;
    tracing::info!(backend = %storage.backend_type(), "Storage backend ready");

    // Setup the generation gateway client
    let gateway = Arc::new(
        GatewayClient::new(&config.gateway).context("Failed to create gateway client")?,
    );

    let state = Arc::new(AppState::new(config, storage, gateway));

    // Setup routes
    let router = routes::build_router(state.clone())?;

    Ok((state, router))
}
