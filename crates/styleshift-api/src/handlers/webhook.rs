//! Webhook receiver for gateway status callbacks.
//!
//! Authenticity is verified before any payload processing: HMAC-SHA256 over
//! the raw body against the configured shared secret. A missing or invalid
//! signature rejects the delivery (fails closed). Valid payloads are logged
//! and published into the run tracker, so the subscription stream and the
//! watchers see pushed status without waiting for the next poll.

use axum::{body::Bytes, extract::State, http::HeaderMap, response::IntoResponse, Json};
use std::sync::Arc;
use styleshift_core::models::{GenerationRun, RunWebhookPayload};
use styleshift_core::AppError;
use styleshift_gateway::{verify_signature, WEBHOOK_SIGNATURE_HEADER};

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::RunSnapshot;
use crate::state::AppState;

/// Receive a signed status callback from the generation gateway.
#[utoipa::path(
    post,
    path = "/api/v0/webhook",
    tag = "webhook",
    request_body = RunWebhookPayload,
    responses(
        (status = 200, description = "Acknowledged"),
        (status = 400, description = "Malformed payload", body = ErrorResponse),
        (status = 401, description = "Missing or invalid signature", body = ErrorResponse)
    )
)]
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let Some(secret) = state.config.gateway.webhook_secret.as_deref() else {
        tracing::warn!("Webhook received but no signing secret is configured; rejecting");
        return Err(
            AppError::Unauthorized("Webhook signature verification unavailable".to_string())
                .into(),
        );
    };

    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !verify_signature(secret, &body, signature) {
        tracing::warn!("Rejected webhook with missing or invalid signature");
        return Err(AppError::Unauthorized("Invalid webhook signature".to_string()).into());
    }

    let payload: RunWebhookPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidInput(format!("Invalid webhook payload: {}", e)))?;

    tracing::info!(
        run_id = %payload.run_id,
        status = %payload.status,
        live_status = ?payload.live_status,
        progress = payload.progress,
        outputs = payload.outputs.len(),
        "Webhook received"
    );

    state
        .runs
        .publish(RunSnapshot::from(GenerationRun::from(payload)));

    // The gateway only needs an acknowledgement; business outcome is ours.
    Ok(Json(serde_json::json!({ "message": "success" })))
}
