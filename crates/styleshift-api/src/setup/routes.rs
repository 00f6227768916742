//! Route configuration and setup.

use crate::api_doc;
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use styleshift_core::Config;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn build_router(state: Arc<AppState>) -> Result<Router<()>> {
    let cors = setup_cors(&state.config)?;
    let body_limit = state.config.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES;

    let api = |path: &str| format!("{}{}", API_PREFIX, path);

    let app = Router::new()
        .route("/health/live", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route("/api/openapi.json", get(api_doc::serve_openapi))
        .route(&api("/uploads"), post(handlers::uploads::upload_asset))
        .route(&api("/uploads/signed-url"), get(handlers::uploads::signed_url))
        .route(&api("/styles"), get(handlers::styles::list_styles))
        .route(&api("/transfers"), post(handlers::transfers::create_transfer))
        .route(&api("/runs"), post(handlers::runs::dispatch_run))
        .route(&api("/runs/status"), get(handlers::runs::run_status))
        .route(&api("/runs/{run_id}/events"), get(handlers::runs::run_events))
        .route(&api("/webhook"), post(handlers::webhook::receive_webhook))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Build the CORS layer from configured origins. `*` allows any origin.
fn setup_cors(config: &Config) -> Result<CorsLayer> {
    let layer = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", origin, e))
            })
            .collect::<Result<Vec<_>>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    };

    Ok(layer)
}
