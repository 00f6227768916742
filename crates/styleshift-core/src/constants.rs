//! Shared constants.

/// Key prefix for user-uploaded source photos. A same-named re-upload lands on
/// the same key and silently overwrites the previous object.
pub const UPLOAD_KEY_PREFIX: &str = "user_uploads";

/// Default lifetime of signed URLs issued for uploaded assets.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

/// Default period between run status polls.
pub const DEFAULT_RUN_POLL_INTERVAL_MS: u64 = 2000;

/// Default cap on status polls per run (5 minutes at the default period).
pub const DEFAULT_RUN_POLL_MAX_ATTEMPTS: u32 = 150;

/// Default upper bound on uploaded photo size (25 MB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 25 * 1024 * 1024;

/// Placeholder callback URL used when no webhook URL override is configured.
/// The gateway will deliver to this dead address; startup logs a warning.
pub const PLACEHOLDER_WEBHOOK_URL: &str = "https://your-domain.example/api/v0/webhook";
