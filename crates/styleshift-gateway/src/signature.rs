//! Webhook signature verification.
//!
//! The gateway signs every callback with HMAC-SHA256 over the raw request
//! body and sends the hex digest in the `X-Webhook-Signature` header as
//! `v1={hex}`. Verification is constant-time and fails closed: any malformed
//! header rejects the delivery.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{GatewayError, GatewayResult};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";

const SIGNATURE_VERSION_PREFIX: &str = "v1=";

/// Sign a payload with HMAC-SHA256, returning the hex digest.
pub fn sign_payload(secret: &str, body: &[u8]) -> GatewayResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| GatewayError::Config("Invalid signing secret".to_string()))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a `v1={hex}` signature header against the raw body.
///
/// Returns false on any mismatch or malformed input; never errors, so callers
/// cannot accidentally treat a verification failure as a server fault.
pub fn verify_signature(secret: &str, body: &[u8], header_value: &str) -> bool {
    let Some(hex_digest) = header_value.strip_prefix(SIGNATURE_VERSION_PREFIX) else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    // verify_slice is a constant-time comparison.
    mac.verify_slice(&expected).is_ok()
}
