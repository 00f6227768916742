//! OpenAPI documentation.

use axum::Json;
use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services::run_tracker;
use styleshift_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Styleshift API",
        version = "0.1.0",
        description = "Photo style-transfer API (v0): upload a photo, pick styles from a fixed catalog, dispatch one generation run per style to the external gateway, and observe run progress via polling, SSE, or signed webhooks. All endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::uploads::upload_asset,
        handlers::uploads::signed_url,
        handlers::styles::list_styles,
        handlers::transfers::create_transfer,
        handlers::runs::dispatch_run,
        handlers::runs::run_status,
        handlers::webhook::receive_webhook,
    ),
    components(schemas(
        models::UploadedAsset,
        models::StyleOption,
        models::GenerationRun,
        models::RunStatus,
        models::OutputEntry,
        models::OutputData,
        models::OutputImage,
        models::NodeMeta,
        models::RunWebhookPayload,
        handlers::uploads::SignedUrlResponse,
        handlers::transfers::CreateTransferRequest,
        handlers::transfers::TransferDispatchResult,
        handlers::transfers::TransferResponse,
        handlers::runs::DispatchRunRequest,
        handlers::runs::DispatchRunResponse,
        run_tracker::RunSnapshot,
        error::ErrorResponse,
    )),
    tags(
        (name = "uploads", description = "Photo upload and signed URLs"),
        (name = "styles", description = "Style catalog"),
        (name = "transfers", description = "Style-selection fan-out"),
        (name = "runs", description = "Run dispatch and status"),
        (name = "webhook", description = "Gateway callbacks")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI spec as JSON.
pub async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
