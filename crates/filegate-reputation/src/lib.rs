//! Filegate Reputation Library
//!
//! HTTP client for the external file-reputation service: verdict lookup by
//! content hash and multipart sample submission. The service answers in XML;
//! decoding lives in [`response`] so the wire mapping is testable without a
//! server.

pub mod client;
pub mod response;
pub mod service;

pub use client::ReputationClient;
pub use response::{decode_submit_response, decode_verdict_response};
pub use service::ReputationService;

/// Errors talking to the reputation service.
#[derive(Debug, thiserror::Error)]
pub enum ReputationError {
    /// Transport failure, timeout, or non-success HTTP status. Distinct from
    /// a service-reported unknown verdict; callers apply their own retry
    /// policy instead of treating this as `Pending`.
    #[error("reputation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The service rejected a submitted sample.
    #[error("submission rejected: {0}")]
    Submission(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
