//! Process-wide shared state (this spec's analogue of the teacher's `AppState`).
//!
//! The teacher lists one `Arc<dyn UseCase>` field per operation because it only
//! has a handful. This service carries on the order of thirty operations across
//! ten modules, so `ServiceContext` instead holds the shared infrastructure
//! handles (db, redis, blob store, kv cache, exif/variants adapters, config);
//! each module builds its own service struct from a `&ServiceContext` at the
//! point it needs one. See `DESIGN.md`.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::blob_store::BlobStore;
use crate::exif::ExifExtractor;
use crate::shared::kv::Kv;
use crate::variants::Variants;

/// Environment-driven knobs that aren't infrastructure handles.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// §4.6: page size for a single sync scan round.
    pub sync_page_size: u64,
    /// §4.3: AccessGuard predicate chunk size for `IN (...)` portability.
    pub access_chunk_size: usize,
    /// §4.6: a session checkpoint older than this many days forces a full reset.
    pub sync_stale_days: i64,
    /// Default `quotaSizeInBytes` for newly created users, if set.
    pub quota_default_bytes: Option<i64>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            sync_page_size: env_u64("SYNC_PAGE_SIZE", 1000),
            access_chunk_size: env_u64("ACCESS_CHUNK_SIZE", 500) as usize,
            sync_stale_days: env_u64("SYNC_STALE_DAYS", 30) as i64,
            quota_default_bytes: std::env::var("QUOTA_DEFAULT_BYTES")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Clone)]
pub struct ServiceContext {
    pub db: DatabaseConnection,
    pub blob_store: Arc<dyn BlobStore>,
    pub kv: Arc<dyn Kv>,
    pub exif: Arc<dyn ExifExtractor>,
    pub variants: Arc<dyn Variants>,
    pub config: AppConfig,
}

impl ServiceContext {
    pub fn new(
        db: DatabaseConnection,
        blob_store: Arc<dyn BlobStore>,
        kv: Arc<dyn Kv>,
        exif: Arc<dyn ExifExtractor>,
        variants: Arc<dyn Variants>,
        config: AppConfig,
    ) -> Self {
        Self {
            db,
            blob_store,
            kv,
            exif,
            variants,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_u64_falls_back_to_default_when_unset() {
        std::env::remove_var("SYNC_PAGE_SIZE_TEST_PROBE");
        assert_eq!(env_u64("SYNC_PAGE_SIZE_TEST_PROBE", 1000), 1000);
    }
}
