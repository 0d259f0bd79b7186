//! File router
//!
//! Executes a [`FileMoveOperation`]: copy to the destination bucket, then
//! delete the original. The two steps are not transactional; a failure
//! between them leaves a duplicate object, never a loss.

use std::sync::Arc;

use filegate_core::{FileMoveOperation, ObjectLocation};
use filegate_storage::{Storage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// The source object no longer exists. On redelivery this means a
    /// previous run already routed the file; callers treat it as resolved.
    #[error("source object missing: {0}")]
    SourceMissing(ObjectLocation),

    #[error("copy failed: {0}")]
    CopyFailed(#[source] StorageError),

    /// Copy succeeded but the source could not be deleted: the object now
    /// exists in both locations. Recoverable inconsistency, not data loss.
    #[error("delete after copy failed, duplicate remains at {destination}: {source}")]
    DeleteFailed {
        destination: ObjectLocation,
        source: StorageError,
    },
}

/// Moves objects between buckets through the storage abstraction.
pub struct FileRouter {
    storage: Arc<dyn Storage>,
}

impl FileRouter {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        FileRouter { storage }
    }

    /// Execute a move exactly once: copy, then delete the original.
    pub async fn execute(&self, op: &FileMoveOperation) -> Result<(), MoveError> {
        match self.storage.copy(&op.source, &op.destination).await {
            Ok(()) => {}
            Err(StorageError::NotFound(_)) => {
                return Err(MoveError::SourceMissing(op.source.clone()))
            }
            Err(e) => return Err(MoveError::CopyFailed(e)),
        }

        if let Err(e) = self.storage.delete(&op.source).await {
            tracing::warn!(
                source = %op.source,
                destination = %op.destination,
                error = %e,
                "delete after copy failed, duplicate object remains"
            );
            return Err(MoveError::DeleteFailed {
                destination: op.destination.clone(),
                source: e,
            });
        }

        tracing::info!(from = %op.source, to = %op.destination, "object moved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filegate_storage::LocalStorage;
    use tempfile::tempdir;

    async fn storage_with(dir: &std::path::Path) -> Arc<dyn Storage> {
        Arc::new(LocalStorage::new(dir).await.unwrap())
    }

    #[tokio::test]
    async fn move_copies_then_deletes_source() {
        let dir = tempdir().unwrap();
        let storage = storage_with(dir.path()).await;
        let router = FileRouter::new(storage.clone());

        let source = ObjectLocation::new("uploads", "a.bin");
        storage.write(&source, b"payload".to_vec()).await.unwrap();

        let op = FileMoveOperation::to_bucket(source.clone(), "clean");
        router.execute(&op).await.unwrap();

        assert!(!storage.exists(&source).await.unwrap());
        assert_eq!(
            storage.read(&op.destination).await.unwrap(),
            b"payload".to_vec()
        );
    }

    #[tokio::test]
    async fn missing_source_is_source_missing() {
        let dir = tempdir().unwrap();
        let storage = storage_with(dir.path()).await;
        let router = FileRouter::new(storage);

        let op = FileMoveOperation::to_bucket(ObjectLocation::new("uploads", "gone.bin"), "clean");
        let result = router.execute(&op).await;

        assert!(matches!(result, Err(MoveError::SourceMissing(_))));
    }

    #[tokio::test]
    async fn invalid_destination_is_copy_failed() {
        let dir = tempdir().unwrap();
        let storage = storage_with(dir.path()).await;
        let router = FileRouter::new(storage.clone());

        let source = ObjectLocation::new("uploads", "a.bin");
        storage.write(&source, b"payload".to_vec()).await.unwrap();

        let op = FileMoveOperation::to_bucket(source.clone(), "../outside");
        let result = router.execute(&op).await;

        assert!(matches!(result, Err(MoveError::CopyFailed(_))));
        // Delete was not attempted; the source is untouched.
        assert!(storage.exists(&source).await.unwrap());
    }
}
