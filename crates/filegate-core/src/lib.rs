//! Filegate Core Library
//!
//! This crate provides the domain models, hash codec, configuration, and
//! secret resolution shared across all filegate components.

pub mod config;
pub mod hash;
pub mod models;
pub mod secrets;
pub mod storage_types;

// Re-export commonly used types
pub use config::{GateConfig, PollBackoff};
pub use hash::{ContentHash, HashDecodeError};
pub use models::{FileMoveOperation, ObjectLocation, RoutingDecision, UploadEvent, Verdict};
pub use secrets::{EnvSecretStore, SecretError, SecretStore};
pub use storage_types::StorageBackend;
