//! Reputation service trait
//!
//! The seam between the orchestrator and the real HTTP client; tests supply
//! scripted implementations.

use async_trait::async_trait;
use filegate_core::{ContentHash, Verdict};

use crate::ReputationError;

#[async_trait]
pub trait ReputationService: Send + Sync {
    /// Query for a verdict on a content hash.
    async fn verdict_by_hash(&self, hash: &ContentHash) -> Result<Verdict, ReputationError>;

    /// Submit file content for asynchronous analysis, keyed by its hash.
    async fn submit(&self, object_name: &str, content: Vec<u8>) -> Result<(), ReputationError>;
}
