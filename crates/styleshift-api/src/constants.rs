//! API-level constants.

/// Path prefix for all versioned API routes.
pub const API_PREFIX: &str = "/api/v0";

/// Slack added to the request body limit on top of the maximum file size, to
/// cover multipart framing and headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
