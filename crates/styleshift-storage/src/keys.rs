//! Shared key generation for storage backends.
//!
//! Key format: `user_uploads/{filename}`. The filename keeps its original
//! name (no deduplication), so a same-named re-upload overwrites the prior
//! object.

use styleshift_core::constants::UPLOAD_KEY_PREFIX;

/// Generate the storage key for an uploaded photo.
///
/// All backends must use this format for consistency.
pub fn upload_key(filename: &str) -> String {
    format!("{}/{}", UPLOAD_KEY_PREFIX, filename)
}

/// Strip path components and control characters from a client-supplied
/// filename before it becomes part of a storage key.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    name.chars()
        .filter(|c| !c.is_control())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}
