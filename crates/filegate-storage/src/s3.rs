use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use filegate_core::{ObjectLocation, StorageBackend};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// S3 storage implementation
///
/// The pipeline moves objects between buckets, so one `AmazonS3` handle is
/// built per bucket on first use and cached. Credentials come from the
/// environment (`AmazonS3Builder::from_env`).
#[derive(Clone)]
pub struct S3Storage {
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    stores: Arc<Mutex<HashMap<String, AmazonS3>>>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible
    ///   providers (e.g., "http://localhost:9000" for MinIO)
    pub fn new(region: String, endpoint_url: Option<String>) -> Self {
        S3Storage {
            region,
            endpoint_url,
            stores: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn store_for(&self, bucket: &str) -> StorageResult<AmazonS3> {
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| StorageError::BackendError("store cache poisoned".to_string()))?;

        if let Some(store) = stores.get(bucket) {
            return Ok(store.clone());
        }

        let mut builder = AmazonS3Builder::from_env()
            .with_region(self.region.clone())
            .with_bucket_name(bucket.to_string());

        if let Some(ref endpoint) = self.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        stores.insert(bucket.to_string(), store.clone());
        Ok(store)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn read(&self, location: &ObjectLocation) -> StorageResult<Vec<u8>> {
        let store = self.store_for(&location.bucket)?;
        let path = Path::from(location.key.clone());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = store.get(&path).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(location.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    location = %location,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 read failed"
                );
                StorageError::ReadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        tracing::debug!(
            location = %location,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 read successful"
        );

        Ok(bytes.to_vec())
    }

    async fn write(&self, location: &ObjectLocation, data: Vec<u8>) -> StorageResult<()> {
        let store = self.store_for(&location.bucket)?;
        let path = Path::from(location.key.clone());
        let size = data.len() as u64;
        let bytes = Bytes::from(data);
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = store.put(&path, PutPayload::from(bytes)).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                location = %location,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 write failed"
            );
            StorageError::WriteFailed(e.to_string())
        })?;

        tracing::debug!(
            location = %location,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 write successful"
        );

        Ok(())
    }

    async fn copy(&self, from: &ObjectLocation, to: &ObjectLocation) -> StorageResult<()> {
        let start = std::time::Instant::now();

        if from.bucket == to.bucket {
            // Same bucket: server-side copy.
            let store = self.store_for(&from.bucket)?;
            let from_path = Path::from(from.key.clone());
            let to_path = Path::from(to.key.clone());

            let result: ObjectResult<_> = store.copy(&from_path, &to_path).await;
            result.map_err(|e| match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(from.to_string()),
                other => StorageError::CopyFailed(other.to_string()),
            })?;
        } else {
            // Cross-bucket: stream through this process. Object stores are
            // bucket-scoped, so there is no server-side cross-bucket copy here.
            let data = self.read(from).await?;
            self.write(to, data).await.map_err(|e| match e {
                StorageError::WriteFailed(msg) => StorageError::CopyFailed(msg),
                other => other,
            })?;
        }

        tracing::info!(
            from = %from,
            to = %to,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 copy successful"
        );

        Ok(())
    }

    async fn delete(&self, location: &ObjectLocation) -> StorageResult<()> {
        let store = self.store_for(&location.bucket)?;
        let path = Path::from(location.key.clone());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = store.delete(&path).await;

        match result {
            Ok(()) => {}
            // Deleting a missing object is not an error (redelivery safety).
            Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    location = %location,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            location = %location,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, location: &ObjectLocation) -> StorageResult<bool> {
        let store = self.store_for(&location.bucket)?;
        let path = Path::from(location.key.clone());

        match store.head(&path).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
