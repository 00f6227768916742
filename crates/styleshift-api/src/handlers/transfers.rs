//! Style-selection submission handler.
//!
//! One submission fans out into one generation run per selected style. The
//! fan-out is sequential, and each dispatch fails independently: a failure is
//! reported for its style and the loop proceeds to the next selection. There
//! is no partial-failure rollback.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use styleshift_core::models::find_style;
use styleshift_core::{AppError, ErrorMetadata};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::spawn_run_watcher;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateTransferRequest {
    /// Signed URL of the uploaded photo.
    pub input_image: String,
    /// Selected style identifiers (at least one).
    pub styles: Vec<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TransferDispatchResult {
    pub style_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// True when this (photo, style) pair was already dispatched and the
    /// existing run id was reused.
    pub deduplicated: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TransferResponse {
    /// Run ids of all dispatches that yielded one, in selection order.
    pub run_ids: Vec<String>,
    pub dispatches: Vec<TransferDispatchResult>,
}

/// Dispatch one generation run per selected style.
#[utoipa::path(
    post,
    path = "/api/v0/transfers",
    tag = "transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 200, description = "Dispatch results per style (failures included)", body = TransferResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateTransferRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if req.input_image.trim().is_empty() {
        return Err(AppError::InvalidInput("input_image is required".to_string()).into());
    }
    if req.styles.is_empty() {
        return Err(AppError::InvalidInput("Select at least one style".to_string()).into());
    }

    let mut run_ids = Vec::new();
    let mut dispatches = Vec::with_capacity(req.styles.len());

    for style_id in &req.styles {
        let Some(style) = find_style(style_id) else {
            tracing::warn!(style_id = %style_id, "Unknown style in submission");
            dispatches.push(TransferDispatchResult {
                style_id: style_id.clone(),
                run_id: None,
                error: Some(format!("Unknown style: {}", style_id)),
                deduplicated: false,
            });
            continue;
        };

        match state
            .dispatcher
            .dispatch(&req.input_image, style.image_url)
            .await
        {
            Ok(outcome) => {
                let run_id = outcome.run_id().to_string();
                tracing::info!(
                    style_id = %style.id,
                    run_id = %run_id,
                    deduplicated = outcome.is_duplicate(),
                    "Style transfer dispatched"
                );
                spawn_run_watcher(
                    state.gateway.clone(),
                    state.runs.clone(),
                    run_id.clone(),
                    state.watcher_config(),
                );
                run_ids.push(run_id.clone());
                dispatches.push(TransferDispatchResult {
                    style_id: style_id.clone(),
                    run_id: Some(run_id),
                    error: None,
                    deduplicated: outcome.is_duplicate(),
                });
            }
            Err(e) => {
                // Report and keep going; remaining selections still dispatch.
                tracing::error!(style_id = %style.id, error = %e, "Style transfer dispatch failed");
                dispatches.push(TransferDispatchResult {
                    style_id: style_id.clone(),
                    run_id: None,
                    error: Some(AppError::Gateway(e.to_string()).client_message()),
                    deduplicated: false,
                });
            }
        }
    }

    Ok(Json(TransferResponse { run_ids, dispatches }))
}
