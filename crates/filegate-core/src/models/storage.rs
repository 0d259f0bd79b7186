//! Storage location types

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A bucket-scoped object address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        ObjectLocation {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl Display for ObjectLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// A single-use move of one object between buckets.
///
/// Executed at most once per event resolution: copy to the destination, then
/// delete the original. The two steps are not atomic; a failure in between
/// leaves a duplicate, never a loss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMoveOperation {
    pub source: ObjectLocation,
    pub destination: ObjectLocation,
}

impl FileMoveOperation {
    /// Move `source` into `dest_bucket`, keeping the object key.
    pub fn to_bucket(source: ObjectLocation, dest_bucket: impl Into<String>) -> Self {
        let destination = ObjectLocation::new(dest_bucket, source.key.clone());
        FileMoveOperation {
            source,
            destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_bucket_keeps_key() {
        let op = FileMoveOperation::to_bucket(ObjectLocation::new("uploads", "a.bin"), "clean");
        assert_eq!(op.source.bucket, "uploads");
        assert_eq!(op.destination.bucket, "clean");
        assert_eq!(op.destination.key, "a.bin");
    }

    #[test]
    fn location_display_is_bucket_slash_key() {
        let loc = ObjectLocation::new("uploads", "dir/a.bin");
        assert_eq!(loc.to_string(), "uploads/dir/a.bin");
    }
}
