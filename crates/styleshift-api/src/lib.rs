//! Styleshift API Library
//!
//! This crate provides the HTTP API handlers, application state, and setup
//! for the style-transfer service: photo upload, style catalog, run dispatch,
//! run status (poll + SSE), and the signed webhook receiver.

mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use services::run_tracker::{RunSnapshot, RunTracker};
