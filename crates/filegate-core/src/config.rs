//! Configuration module
//!
//! Environment-sourced configuration for the quarantine pipeline. Resolved
//! once at startup and handed to the orchestrator as an explicit struct;
//! nothing in the pipeline reads the environment after construction.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

// Common constants
const POLL_INTERVAL_SECS: u64 = 60;
const POLL_MAX_ATTEMPTS: u32 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Backoff strategy for the verdict poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollBackoff {
    /// Same delay between every poll (the reference behavior).
    Fixed,
    /// Delay doubles per attempt, capped at ten times the base interval.
    Exponential,
}

impl FromStr for PollBackoff {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(PollBackoff::Fixed),
            "exponential" => Ok(PollBackoff::Exponential),
            _ => Err(anyhow::anyhow!("Invalid poll backoff: {}", s)),
        }
    }
}

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct GateConfig {
    /// Destination bucket for files with a benign verdict.
    pub clean_bucket: String,
    /// Destination bucket for files with a malicious verdict.
    pub quarantine_bucket: String,
    /// Project/namespace identifier used when resolving secret names.
    pub project_id: Option<String>,
    /// Secret name holding the reputation service host.
    pub api_portal_secret: String,
    /// Secret name holding the reputation service API key.
    pub api_key_secret: String,
    /// HTTP timeout for reputation-service calls.
    pub request_timeout_secs: u64,
    // Poll loop configuration
    pub poll_interval_secs: u64,
    pub poll_max_attempts: u32,
    pub poll_backoff: PollBackoff,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
}

impl GateConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let clean_bucket = env::var("CLEAN_BUCKET")
            .or_else(|_| env::var("SCANNED_BUCKET"))
            .map_err(|_| anyhow::anyhow!("CLEAN_BUCKET (or SCANNED_BUCKET) must be set"))?;
        let quarantine_bucket = env::var("QUARANTINE_BUCKET")
            .map_err(|_| anyhow::anyhow!("QUARANTINE_BUCKET must be set"))?;

        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or(StorageBackend::S3);

        let config = GateConfig {
            clean_bucket,
            quarantine_bucket,
            project_id: env::var("PROJECT_ID")
                .or_else(|_| env::var("GCP_PROJECT"))
                .ok()
                .filter(|s| !s.is_empty()),
            api_portal_secret: env::var("API_PORTAL_SECRET")
                .unwrap_or_else(|_| "reputation_api_portal".to_string()),
            api_key_secret: env::var("API_KEY_SECRET")
                .unwrap_or_else(|_| "reputation_api_key".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| REQUEST_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(REQUEST_TIMEOUT_SECS),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| POLL_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(POLL_INTERVAL_SECS),
            poll_max_attempts: env::var("POLL_MAX_ATTEMPTS")
                .unwrap_or_else(|_| POLL_MAX_ATTEMPTS.to_string())
                .parse()
                .unwrap_or(POLL_MAX_ATTEMPTS),
            poll_backoff: env::var("POLL_BACKOFF")
                .ok()
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(PollBackoff::Fixed),
            storage_backend,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.clean_bucket == self.quarantine_bucket {
            return Err(anyhow::anyhow!(
                "CLEAN_BUCKET and QUARANTINE_BUCKET must differ"
            ));
        }

        if self.poll_max_attempts == 0 {
            return Err(anyhow::anyhow!("POLL_MAX_ATTEMPTS must be at least 1"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
