//! Content-addressed object storage port (§2 item 3, §6.4 key layout).
//!
//! The core never talks to a cloud SDK directly — everything goes through the
//! `BlobStore` trait so ingest/retrieve/trash stay testable with an in-memory
//! fake. The only production adapter is `gcs`.

mod gcs;

pub use gcs::GcsBlobStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobStoreError {
    #[error("object not found")]
    NotFound,
    #[error("access denied")]
    AccessDenied,
    #[error("bucket not found")]
    BucketNotFound,
    #[error("storage misconfigured")]
    Configuration,
    #[error("storage infrastructure error")]
    Infrastructure,
}

/// A byte range request, inclusive on both ends (`Range: bytes=a-b`).
#[derive(Debug, Clone, Copy)]
pub struct ByteRange {
    pub offset: u64,
    pub length: u64,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes `bytes` to `key`, overwriting any existing object.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), BlobStoreError>;

    /// Reads the whole object, or just `range` of it when given.
    async fn get(&self, key: &str, range: Option<ByteRange>) -> Result<Vec<u8>, BlobStoreError>;

    /// Total object size in bytes, without transferring the body.
    async fn size(&self, key: &str) -> Result<u64, BlobStoreError>;

    /// Deletes `key`. Deleting a missing key is not an error (idempotent, so
    /// trash-purge retries are safe).
    async fn delete(&self, key: &str) -> Result<(), BlobStoreError>;

    /// Lists keys under `prefix`, used by the folder-view janitor and by
    /// orphan-blob reconciliation (§9).
    async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobStoreError>;
}

pub mod key {
    //! §6.4 object-store layout.

    pub fn original(owner_id: &str, asset_id: &str, ext: &str) -> String {
        format!("upload/{owner_id}/{asset_id}/original.{ext}")
    }

    pub fn sidecar(owner_id: &str, asset_id: &str) -> String {
        format!("upload/{owner_id}/{asset_id}/sidecar.xmp")
    }

    pub fn thumbnail(owner_id: &str, asset_id: &str) -> String {
        format!("thumbs/{owner_id}/{asset_id}/thumbnail.webp")
    }

    pub fn preview(owner_id: &str, asset_id: &str) -> String {
        format!("thumbs/{owner_id}/{asset_id}/preview.webp")
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory `BlobStore` for unit tests. Not a substitute for grounding
    /// the real adapter's behavior — just a fast, deterministic double.
    #[derive(Default)]
    pub struct FakeBlobStore {
        objects: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl FakeBlobStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn contains(&self, key: &str) -> bool {
            self.objects.lock().unwrap().contains_key(key)
        }
    }

    #[async_trait]
    impl BlobStore for FakeBlobStore {
        async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), BlobStoreError> {
            self.objects.lock().unwrap().insert(key.to_string(), bytes);
            Ok(())
        }

        async fn get(&self, key: &str, range: Option<ByteRange>) -> Result<Vec<u8>, BlobStoreError> {
            let guard = self.objects.lock().unwrap();
            let bytes = guard.get(key).ok_or(BlobStoreError::NotFound)?;
            match range {
                None => Ok(bytes.clone()),
                Some(r) => {
                    let start = r.offset as usize;
                    let end = ((r.offset + r.length) as usize).min(bytes.len());
                    if start >= bytes.len() {
                        return Ok(Vec::new());
                    }
                    Ok(bytes[start..end].to_vec())
                }
            }
        }

        async fn size(&self, key: &str) -> Result<u64, BlobStoreError> {
            let guard = self.objects.lock().unwrap();
            guard
                .get(key)
                .map(|b| b.len() as u64)
                .ok_or(BlobStoreError::NotFound)
        }

        async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }

        async fn list(&self, prefix: &str) -> Result<Vec<String>, BlobStoreError> {
            let guard = self.objects.lock().unwrap();
            Ok(guard.keys().filter(|k| k.starts_with(prefix)).cloned().collect())
        }
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = FakeBlobStore::new();
        store.put("upload/u1/a1/original.jpg", vec![1, 2, 3, 4]).await.unwrap();
        let bytes = store.get("upload/u1/a1/original.jpg", None).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn ranged_get_returns_requested_slice() {
        let store = FakeBlobStore::new();
        store.put("k", vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]).await.unwrap();
        let bytes = store
            .get("k", Some(ByteRange { offset: 2, length: 3 }))
            .await
            .unwrap();
        assert_eq!(bytes, vec![2, 3, 4]);
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let store = FakeBlobStore::new();
        let err = store.get("missing", None).await.unwrap_err();
        assert_eq!(err, BlobStoreError::NotFound);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = FakeBlobStore::new();
        store.delete("missing").await.unwrap();
    }
}
