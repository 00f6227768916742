//! Photo upload and signed URL handlers.

use axum::{
    extract::{Multipart, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use styleshift_core::constants::UPLOAD_KEY_PREFIX;
use styleshift_core::models::UploadedAsset;
use styleshift_core::{AppError, Config};
use styleshift_storage::{sanitize_filename, Storage};

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SignedUrlQuery {
    /// Storage key of a previously uploaded photo.
    pub key: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SignedUrlResponse {
    pub url: String,
    pub expires_in_secs: u64,
}

/// Check an upload against the configured constraints before it touches the
/// storage gateway.
fn validate_upload(
    filename: &str,
    content_type: &str,
    size: usize,
    config: &Config,
) -> Result<(), AppError> {
    if filename.is_empty() {
        return Err(AppError::InvalidInput(
            "Uploaded file has no filename".to_string(),
        ));
    }
    if size == 0 {
        return Err(AppError::InvalidInput("File is empty".to_string()));
    }
    if size > config.max_file_size_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds max {} bytes",
            size, config.max_file_size_bytes
        )));
    }

    let extension = filename
        .rsplit('.')
        .next()
        .filter(|ext| *ext != filename)
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| {
            AppError::InvalidInput(format!("Missing file extension (filename: {})", filename))
        })?;
    if !config.allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid extension '{}', allowed: {:?}",
            extension, config.allowed_extensions
        )));
    }

    let content_type = content_type.to_lowercase();
    if !config.allowed_content_types.contains(&content_type) {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type '{}', allowed: {:?}",
            content_type, config.allowed_content_types
        )));
    }

    Ok(())
}

/// Upload a photo.
///
/// The storage key is derived from the original filename, so uploading the
/// same name again overwrites the previous object. Returns the asset with a
/// signed URL the style-selection flow can hand to the gateway.
#[utoipa::path(
    post,
    path = "/api/v0/uploads",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo uploaded", body = UploadedAsset),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_asset(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(sanitize_filename) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;
        file = Some((filename, content_type, data));
        break;
    }

    let Some((filename, content_type, data)) = file else {
        return Err(AppError::InvalidInput("No file field in upload".to_string()).into());
    };

    validate_upload(&filename, &content_type, data.len(), &state.config)?;

    tracing::info!(
        filename = %filename,
        content_type = %content_type,
        size_bytes = data.len(),
        "Uploading photo"
    );

    let (storage_key, _url) = state
        .storage
        .upload(&filename, &content_type, data.to_vec())
        .await
        .map_err(HttpAppError::from)?;

    let signed_url = state
        .storage
        .get_presigned_url(&storage_key, state.config.signed_url_ttl())
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(UploadedAsset {
        storage_key,
        url: signed_url,
        content_type,
        uploaded_at: Utc::now(),
    }))
}

/// Re-derive a signed URL for a previously uploaded photo.
#[utoipa::path(
    get,
    path = "/api/v0/uploads/signed-url",
    tag = "uploads",
    params(SignedUrlQuery),
    responses(
        (status = 200, description = "Signed URL", body = SignedUrlResponse),
        (status = 400, description = "Missing or invalid key", body = ErrorResponse),
        (status = 404, description = "Object not found", body = ErrorResponse)
    )
)]
pub async fn signed_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SignedUrlQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Some(key) = query.key.filter(|k| !k.is_empty()) else {
        return Err(AppError::InvalidInput("Missing key".to_string()).into());
    };

    // Only uploaded photos are addressable through this endpoint.
    if !key.starts_with(&format!("{}/", UPLOAD_KEY_PREFIX)) {
        return Err(AppError::InvalidInput(format!(
            "Key must start with {}/",
            UPLOAD_KEY_PREFIX
        ))
        .into());
    }

    if !state.storage.exists(&key).await.map_err(HttpAppError::from)? {
        return Err(AppError::NotFound(format!("No object at key {}", key)).into());
    }

    let ttl = state.config.signed_url_ttl();
    let url = state
        .storage
        .get_presigned_url(&key, ttl)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(SignedUrlResponse {
        url,
        expires_in_secs: ttl.as_secs(),
    }))
}
