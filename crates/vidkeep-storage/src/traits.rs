//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use thiserror::Error;
use vidkeep_core::StorageBackend;

/// Storage operation errors
///
/// `Unavailable` marks transient failures (network, service availability)
/// where a caller-level retry of the whole upload is safe; `Rejected` marks
/// terminal ones (permissions, quota, invalid request).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage rejected request: {0}")]
    Rejected(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// This allows the upload pipeline to work with any storage backend without
/// coupling to specific implementation details.
///
/// **Key format:** `{video_id}.mp4` (see the crate root documentation).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload an object under `key`, tagging it with `content_type`, and
    /// return its publicly addressable URL.
    ///
    /// Putting to an existing key overwrites the previous object.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Delete an object by key.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
