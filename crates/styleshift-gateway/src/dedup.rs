//! Stable dispatch keys for duplicate suppression.
//!
//! Resubmitting a style selection must not redispatch jobs that already
//! succeeded, so every dispatch derives a key from its inputs. The same
//! (photo, style) pair always hashes to the same key.

use sha2::{Digest, Sha256};

/// Derive the idempotency key for one dispatch: SHA-256 over the input image
/// URL and the style reference URL, separated by a NUL so neither value can
/// bleed into the other.
pub fn dispatch_key(input_image: &str, input_image_style: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input_image.as_bytes());
    hasher.update([0u8]);
    hasher.update(input_image_style.as_bytes());
    hex::encode(hasher.finalize())
}
