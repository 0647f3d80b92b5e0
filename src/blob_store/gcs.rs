use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{BlobStore, BlobStoreError, ByteRange};

fn bucket_resource(bucket: &str) -> String {
    format!("projects/_/buckets/{}", bucket)
}

fn map_error(msg: &str) -> BlobStoreError {
    let m = msg.to_lowercase();

    if m.contains("permission") || m.contains("forbidden") || m.contains("denied") {
        BlobStoreError::AccessDenied
    } else if m.contains("bucket") && (m.contains("not found") || m.contains("404")) {
        BlobStoreError::BucketNotFound
    } else if m.contains("404") || m.contains("not found") {
        BlobStoreError::NotFound
    } else if m.contains("invalid") || m.contains("config") || m.contains("configuration") {
        BlobStoreError::Configuration
    } else {
        BlobStoreError::Infrastructure
    }
}

/// Internal seam to make the adapter testable without a live GCS bucket.
#[async_trait]
trait GcsClient: Send + Sync {
    async fn put_object(&self, bucket: &str, object: &str, bytes: Vec<u8>) -> Result<(), String>;

    async fn get_object(
        &self,
        bucket: &str,
        object: &str,
        range: Option<ByteRange>,
    ) -> Result<Vec<u8>, String>;

    async fn object_size(&self, bucket: &str, object: &str) -> Result<u64, String>;

    async fn delete_object(&self, bucket: &str, object: &str) -> Result<(), String>;

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, String>;
}

#[cfg(test)]
struct ArcGcsClient(Arc<dyn GcsClient>);

#[cfg(test)]
#[async_trait]
impl GcsClient for ArcGcsClient {
    async fn put_object(&self, bucket: &str, object: &str, bytes: Vec<u8>) -> Result<(), String> {
        self.0.put_object(bucket, object, bytes).await
    }

    async fn get_object(
        &self,
        bucket: &str,
        object: &str,
        range: Option<ByteRange>,
    ) -> Result<Vec<u8>, String> {
        self.0.get_object(bucket, object, range).await
    }

    async fn object_size(&self, bucket: &str, object: &str) -> Result<u64, String> {
        self.0.object_size(bucket, object).await
    }

    async fn delete_object(&self, bucket: &str, object: &str) -> Result<(), String> {
        self.0.delete_object(bucket, object).await
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, String> {
        self.0.list_objects(bucket, prefix).await
    }
}

/// Production `BlobStore` backed by a single GCS bucket, keyed by `BLOB_BUCKET`.
#[derive(Clone)]
pub struct GcsBlobStore {
    client: Arc<OnceCell<Box<dyn GcsClient>>>,
    bucket: String,
}

impl GcsBlobStore {
    /// Synchronous constructor; the underlying client is built lazily on first use.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            client: Arc::new(OnceCell::new()),
            bucket: bucket.into(),
        }
    }

    async fn get_client(&self) -> Result<&dyn GcsClient, BlobStoreError> {
        self.client
            .get_or_try_init(|| async {
                let real = RealGcsClient::new()
                    .await
                    .map_err(|_| BlobStoreError::Infrastructure)?;
                Ok(Box::new(real) as Box<dyn GcsClient>)
            })
            .await
            .map(|boxed| &**boxed)
    }

    #[cfg(test)]
    fn with_client(client: Arc<dyn GcsClient>, bucket: impl Into<String>) -> Self {
        let once = OnceCell::new();
        let _ = once.set(Box::new(ArcGcsClient(client)) as Box<dyn GcsClient>);
        Self {
            client: Arc::new(once),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), BlobStoreError> {
        let client = self.get_client().await?;
        let bucket = bucket_resource(&self.bucket);
        client
            .put_object(&bucket, key, bytes)
            .await
            .map_err(|e| map_error(&e))
    }

    async fn get(&self, key: &str, range: Option<ByteRange>) -> Result<Vec<u8>, BlobStoreError> {
        let client = self.get_client().await?;
        let bucket = bucket_resource(&self.bucket);
        client
            .get_object(&bucket, key, range)
            .await
            .map_err(|e| map_error(&e))
    }

    async fn size(&self, key: &str) -> Result<u64, BlobStoreError> {
        let client = self.get_client().await?;
        let bucket = bucket_resource(&self.bucket);
        client.object_size(&bucket, key).await.map_err(|e| map_error(&e))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        let client = self.get_client().await?;
        let bucket = bucket_resource(&self.bucket);
        match client.delete_object(&bucket, key).await {
            Ok(()) => Ok(()),
            Err(e) if map_error(&e) == BlobStoreError::NotFound => Ok(()),
            Err(e) => Err(map_error(&e)),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobStoreError> {
        let client = self.get_client().await?;
        let bucket = bucket_resource(&self.bucket);
        client.list_objects(&bucket, prefix).await.map_err(|e| map_error(&e))
    }
}

// ============================================================================
// Real Google Cloud Storage client (google-cloud-storage)
// ============================================================================

struct RealGcsClient {
    storage: google_cloud_storage::client::Storage,
}

impl RealGcsClient {
    async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!("initializing GCS blob store client");

        let storage = google_cloud_storage::client::Storage::builder()
            .build()
            .await
            .map_err(|e| {
                tracing::error!("failed to build GCS storage client: {:?}", e);
                e
            })?;

        Ok(Self { storage })
    }
}

#[async_trait]
impl GcsClient for RealGcsClient {
    async fn put_object(&self, bucket: &str, object: &str, bytes: Vec<u8>) -> Result<(), String> {
        self.storage
            .write_object(bucket.to_string(), object.to_string(), bytes)
            .send_unbuffered()
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn get_object(
        &self,
        bucket: &str,
        object: &str,
        range: Option<ByteRange>,
    ) -> Result<Vec<u8>, String> {
        use futures::StreamExt;

        let mut builder = self
            .storage
            .read_object(bucket.to_string(), object.to_string());

        if let Some(r) = range {
            builder = builder.with_range(r.offset, r.offset + r.length);
        }

        let mut stream = builder.send().await.map_err(|e| e.to_string())?;

        let mut out = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| e.to_string())?;
            out.extend_from_slice(&chunk);
        }

        Ok(out)
    }

    async fn object_size(&self, bucket: &str, object: &str) -> Result<u64, String> {
        let metadata = self
            .storage
            .get_object(bucket.to_string(), object.to_string())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        Ok(metadata.size as u64)
    }

    async fn delete_object(&self, bucket: &str, object: &str) -> Result<(), String> {
        self.storage
            .delete_object(bucket.to_string(), object.to_string())
            .send()
            .await
            .map_err(|e| e.to_string())
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, String> {
        use futures::StreamExt;

        let mut names = Vec::new();
        let mut stream = self
            .storage
            .list_objects(bucket.to_string())
            .with_prefix(prefix.to_string())
            .by_item();

        while let Some(item) = stream.next().await {
            let item = item.map_err(|e| e.to_string())?;
            names.push(item.name);
        }

        Ok(names)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeGcsClient {
        objects: Mutex<std::collections::HashMap<String, Vec<u8>>>,
        fail_with: Mutex<Option<String>>,
    }

    impl FakeGcsClient {
        fn new() -> Self {
            Self {
                objects: Mutex::new(std::collections::HashMap::new()),
                fail_with: Mutex::new(None),
            }
        }

        fn set_failure(&self, msg: &str) {
            *self.fail_with.lock().unwrap() = Some(msg.to_string());
        }
    }

    #[async_trait]
    impl GcsClient for FakeGcsClient {
        async fn put_object(&self, _bucket: &str, object: &str, bytes: Vec<u8>) -> Result<(), String> {
            if let Some(msg) = self.fail_with.lock().unwrap().clone() {
                return Err(msg);
            }
            self.objects.lock().unwrap().insert(object.to_string(), bytes);
            Ok(())
        }

        async fn get_object(
            &self,
            _bucket: &str,
            object: &str,
            range: Option<ByteRange>,
        ) -> Result<Vec<u8>, String> {
            if let Some(msg) = self.fail_with.lock().unwrap().clone() {
                return Err(msg);
            }
            let guard = self.objects.lock().unwrap();
            let bytes = guard.get(object).ok_or_else(|| "404 Not Found".to_string())?;
            match range {
                None => Ok(bytes.clone()),
                Some(r) => {
                    let start = r.offset as usize;
                    let end = ((r.offset + r.length) as usize).min(bytes.len());
                    Ok(bytes[start..end].to_vec())
                }
            }
        }

        async fn object_size(&self, _bucket: &str, object: &str) -> Result<u64, String> {
            let guard = self.objects.lock().unwrap();
            guard
                .get(object)
                .map(|b| b.len() as u64)
                .ok_or_else(|| "404 Not Found".to_string())
        }

        async fn delete_object(&self, _bucket: &str, object: &str) -> Result<(), String> {
            self.objects.lock().unwrap().remove(object);
            Ok(())
        }

        async fn list_objects(&self, _bucket: &str, prefix: &str) -> Result<Vec<String>, String> {
            let guard = self.objects.lock().unwrap();
            Ok(guard.keys().filter(|k| k.starts_with(prefix)).cloned().collect())
        }
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let fake = Arc::new(FakeGcsClient::new());
        let store = GcsBlobStore::with_client(fake, "test-bucket");

        store.put("upload/u1/a1/original.jpg", vec![1, 2, 3]).await.unwrap();
        let bytes = store.get("upload/u1/a1/original.jpg", None).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_object_maps_to_not_found() {
        let fake = Arc::new(FakeGcsClient::new());
        let store = GcsBlobStore::with_client(fake, "test-bucket");

        let err = store.get("missing", None).await.unwrap_err();
        assert_eq!(err, BlobStoreError::NotFound);
    }

    #[tokio::test]
    async fn permission_error_maps_to_access_denied() {
        let fake = Arc::new(FakeGcsClient::new());
        fake.set_failure("Permission denied");
        let store = GcsBlobStore::with_client(fake, "test-bucket");

        let err = store.put("k", vec![1]).await.unwrap_err();
        assert_eq!(err, BlobStoreError::AccessDenied);
    }

    #[tokio::test]
    async fn ranged_get_returns_requested_slice() {
        let fake = Arc::new(FakeGcsClient::new());
        let store = GcsBlobStore::with_client(fake, "test-bucket");

        store.put("k", vec![0, 1, 2, 3, 4, 5]).await.unwrap();
        let bytes = store
            .get("k", Some(ByteRange { offset: 1, length: 3 }))
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_is_idempotent_even_when_missing() {
        let fake = Arc::new(FakeGcsClient::new());
        let store = GcsBlobStore::with_client(fake, "test-bucket");

        store.delete("never-existed").await.unwrap();
    }
}
