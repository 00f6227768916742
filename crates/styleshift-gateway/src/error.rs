//! Gateway operation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gateway returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("Gateway configuration error: {0}")]
    Config(String),
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
