use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use filegate_core::{ObjectLocation, StorageBackend};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Buckets map to directories directly under the base path; object keys to
/// paths within them.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory holding one subdirectory per bucket
    ///   (e.g., "/var/lib/filegate/buckets")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert a location to a filesystem path with security validation
    ///
    /// Rejects bucket names and keys containing path traversal sequences that
    /// could escape the base storage directory.
    fn location_to_path(&self, location: &ObjectLocation) -> StorageResult<PathBuf> {
        for part in [location.bucket.as_str(), location.key.as_str()] {
            if part.is_empty() || part.contains("..") || part.starts_with('/') {
                return Err(StorageError::InvalidKey(format!(
                    "Location {} contains invalid characters",
                    location
                )));
            }
        }

        Ok(self.base_path.join(&location.bucket).join(&location.key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn read(&self, location: &ObjectLocation) -> StorageResult<Vec<u8>> {
        let path = self.location_to_path(location)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(location.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            location = %location,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(data)
    }

    async fn write(&self, location: &ObjectLocation, data: Vec<u8>) -> StorageResult<()> {
        let path = self.location_to_path(location)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            location = %location,
            size_bytes = size,
            "Local storage write successful"
        );

        Ok(())
    }

    async fn copy(&self, from: &ObjectLocation, to: &ObjectLocation) -> StorageResult<()> {
        let from_path = self.location_to_path(from)?;
        let to_path = self.location_to_path(to)?;

        if !fs::try_exists(&from_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(from.to_string()));
        }

        self.ensure_parent_dir(&to_path).await?;

        fs::copy(&from_path, &to_path).await.map_err(|e| {
            StorageError::CopyFailed(format!(
                "Failed to copy {} to {}: {}",
                from_path.display(),
                to_path.display(),
                e
            ))
        })?;

        tracing::info!(
            from = %from,
            to = %to,
            "Local storage copy successful"
        );

        Ok(())
    }

    async fn delete(&self, location: &ObjectLocation) -> StorageResult<()> {
        let path = self.location_to_path(location)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(location = %location, "Local storage delete successful");

        Ok(())
    }

    async fn exists(&self, location: &ObjectLocation) -> StorageResult<bool> {
        let path = self.location_to_path(location)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn loc(bucket: &str, key: &str) -> ObjectLocation {
        ObjectLocation::new(bucket, key)
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let location = loc("uploads", "test.txt");
        let data = b"test data".to_vec();

        storage.write(&location, data.clone()).await.unwrap();
        let read_back = storage.read(&location).await.unwrap();
        assert_eq!(data, read_back);
    }

    #[tokio::test]
    async fn read_missing_object_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.read(&loc("uploads", "missing.bin")).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.read(&loc("uploads", "../../../etc/passwd")).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete(&loc("../etc", "passwd")).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists(&loc("uploads", "/etc/passwd")).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn delete_nonexistent_is_ok() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.delete(&loc("uploads", "nonexistent.txt")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn copy_across_buckets() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let from = loc("uploads", "original.txt");
        let to = loc("clean", "original.txt");
        let data = b"original content".to_vec();

        storage.write(&from, data.clone()).await.unwrap();
        storage.copy(&from, &to).await.unwrap();

        let copied = storage.read(&to).await.unwrap();
        assert_eq!(data, copied);
        // Copy does not remove the source.
        assert!(storage.exists(&from).await.unwrap());
    }

    #[tokio::test]
    async fn copy_missing_source_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage
            .copy(&loc("uploads", "ghost.bin"), &loc("clean", "ghost.bin"))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn exists_reflects_lifecycle() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let location = loc("uploads", "exists.txt");
        assert!(!storage.exists(&location).await.unwrap());

        storage.write(&location, b"test".to_vec()).await.unwrap();
        assert!(storage.exists(&location).await.unwrap());

        storage.delete(&location).await.unwrap();
        assert!(!storage.exists(&location).await.unwrap());
    }
}
