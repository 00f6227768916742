//! Run dispatch, status, and subscription handlers.

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use styleshift_core::models::GenerationRun;
use styleshift_core::AppError;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::{spawn_run_watcher, RunSnapshot, RunTracker};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct DispatchRunRequest {
    /// URL of the source photo.
    #[serde(default)]
    pub input_image: Option<String>,
    /// URL of the style reference image.
    #[serde(default)]
    pub input_image_style: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DispatchRunResponse {
    #[serde(rename = "runId")]
    pub run_id: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RunStatusQuery {
    #[serde(rename = "runId")]
    pub run_id: Option<String>,
}

/// Dispatch one generation run for a (photo, style) pair.
#[utoipa::path(
    post,
    path = "/api/v0/runs",
    tag = "runs",
    request_body = DispatchRunRequest,
    responses(
        (status = 200, description = "Run queued", body = DispatchRunResponse),
        (status = 400, description = "Missing input", body = ErrorResponse),
        (status = 500, description = "Gateway failure", body = ErrorResponse)
    )
)]
pub async fn dispatch_run(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<DispatchRunRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (Some(input_image), Some(input_image_style)) = (
        req.input_image.filter(|v| !v.trim().is_empty()),
        req.input_image_style.filter(|v| !v.trim().is_empty()),
    ) else {
        return Err(AppError::InvalidInput("Missing required inputs.".to_string()).into());
    };

    let outcome = state
        .dispatcher
        .dispatch(&input_image, &input_image_style)
        .await
        .map_err(HttpAppError::from)?;

    let run_id = outcome.run_id().to_string();
    spawn_run_watcher(
        state.gateway.clone(),
        state.runs.clone(),
        run_id.clone(),
        state.watcher_config(),
    );

    Ok(Json(DispatchRunResponse { run_id }))
}

/// Fetch the current status of a run.
///
/// Proxies the gateway and publishes the observed snapshot into the run
/// tracker, so polled and webhook-pushed signals land in the same store.
#[utoipa::path(
    get,
    path = "/api/v0/runs/status",
    tag = "runs",
    params(RunStatusQuery),
    responses(
        (status = 200, description = "Run status", body = GenerationRun),
        (status = 400, description = "Missing runId", body = ErrorResponse),
        (status = 500, description = "Fetch failure", body = ErrorResponse)
    )
)]
pub async fn run_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RunStatusQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Some(run_id) = query.run_id.filter(|v| !v.is_empty()) else {
        return Err(AppError::InvalidInput("Missing runId".to_string()).into());
    };

    let run = state
        .gateway
        .get_run(&run_id)
        .await
        .map_err(HttpAppError::from)?;

    state.runs.publish(RunSnapshot::from(run.clone()));

    Ok(Json(run))
}

/// Subscribe to a run's snapshots as server-sent events.
///
/// Emits the latest known snapshot immediately, then every change from either
/// the polling watcher or the webhook receiver. The stream ends after a
/// terminal snapshot has been delivered.
pub async fn run_events(
    State(tracker): State<RunTracker>,
    Path(run_id): Path<String>,
) -> impl IntoResponse {
    let rx = tracker.subscribe(&run_id);

    // Emit the current snapshot first, then one event per change; the stream
    // closes right after a terminal snapshot (or when the run entry is gone).
    let stream = futures::stream::unfold(Some((rx, true)), |state| async move {
        let (mut rx, first) = state?;
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        let next = if snapshot.is_terminal() {
            None
        } else {
            Some((rx, false))
        };
        Some((Event::default().json_data(&snapshot), next))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
