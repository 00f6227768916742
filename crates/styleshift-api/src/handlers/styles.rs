//! Style catalog handler.

use axum::{response::IntoResponse, Json};
use styleshift_core::models::{style_catalog, StyleOption};

/// List the fixed style catalog.
#[utoipa::path(
    get,
    path = "/api/v0/styles",
    tag = "styles",
    responses(
        (status = 200, description = "Style catalog", body = [StyleOption]),
    )
)]
pub async fn list_styles() -> impl IntoResponse {
    Json(style_catalog())
}
