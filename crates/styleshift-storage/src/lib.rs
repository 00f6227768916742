//! Styleshift Storage Library
//!
//! This crate provides the storage abstraction used to host uploaded photos
//! and issue time-limited signed URLs for them. It includes the Storage trait
//! and implementations for S3-compatible object stores and the local
//! filesystem.
//!
//! # Storage key format
//!
//! All uploaded photos live under `user_uploads/{filename}`. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the `keys`
//! module so all backends stay consistent, and a same-named upload overwrites
//! the existing object.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{sanitize_filename, upload_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use styleshift_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
