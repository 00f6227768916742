use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A photo uploaded to the storage gateway.
///
/// Identified by its storage key. The URL is a time-limited signed URL and can
/// be re-derived for the same key at any time; the asset itself is never
/// deleted by this system.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadedAsset {
    pub storage_key: String,
    pub url: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}
