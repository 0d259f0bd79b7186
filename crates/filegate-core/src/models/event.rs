//! Upload event payload
//!
//! The hosting runtime delivers one event per object creation, at-least-once.
//! The event is read-only to the pipeline; nothing is persisted beyond the
//! invocation that handles it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::storage::ObjectLocation;

/// Object-storage upload event as delivered by the provider.
///
/// Field names follow the provider's JSON payload (camelCase). Only `bucket`,
/// `name`, and `md5Hash` drive routing; the rest is passthrough metadata kept
/// for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEvent {
    /// Source bucket the object was uploaded to.
    pub bucket: String,
    /// Object name within the bucket.
    pub name: String,
    /// Content digest in the provider's encoding (base64 of the raw bytes).
    pub md5_hash: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub time_created: Option<DateTime<Utc>>,
}

impl UploadEvent {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>, md5_hash: impl Into<String>) -> Self {
        UploadEvent {
            bucket: bucket.into(),
            name: name.into(),
            md5_hash: md5_hash.into(),
            content_type: None,
            size: None,
            time_created: None,
        }
    }

    /// Location of the uploaded object.
    pub fn source_location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.bucket, &self.name)
    }
}
