//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must
//! implement.

use async_trait::async_trait;
use filegate_core::ObjectLocation;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

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
/// The file router works against it without coupling to a provider, and the
/// orchestrator reads object content through it for submission.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the full content of an object.
    async fn read(&self, location: &ObjectLocation) -> StorageResult<Vec<u8>>;

    /// Write data to a location, creating or overwriting the object.
    async fn write(&self, location: &ObjectLocation, data: Vec<u8>) -> StorageResult<()>;

    /// Copy an object between locations (possibly across buckets).
    ///
    /// Fails with `NotFound` when the source object does not exist.
    async fn copy(&self, from: &ObjectLocation, to: &ObjectLocation) -> StorageResult<()>;

    /// Delete an object. Deleting a missing object is not an error.
    async fn delete(&self, location: &ObjectLocation) -> StorageResult<()>;

    /// Check if an object exists.
    async fn exists(&self, location: &ObjectLocation) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> filegate_core::StorageBackend;
}
