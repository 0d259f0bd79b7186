//! Filegate Storage Library
//!
//! This crate provides the storage abstraction the pipeline moves files
//! through. It includes the `Storage` trait and implementations for S3 and
//! the local filesystem.
//!
//! # Locations
//!
//! Every operation takes an [`ObjectLocation`] (`bucket` + `key`): the
//! pipeline copies objects *between* buckets, so a backend is not scoped to a
//! single bucket the way a per-tenant media store would be. Keys must not
//! contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use filegate_core::{ObjectLocation, StorageBackend};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
