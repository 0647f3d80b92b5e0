//! Test-only `ServiceContext` construction, grounded in the teacher's
//! `TestAppStateBuilder` (`tests/support/app_state_builder.rs`): a builder
//! that defaults every port to a fast in-memory fake, with setters to swap in
//! a `sea_orm::MockDatabase` connection or a specific canned response where a
//! test needs one.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, MockDatabase, MockExecResult};

use crate::blob_store::fake::FakeBlobStore;
use crate::blob_store::BlobStore;
use crate::exif::fake::FakeExifExtractor;
use crate::exif::{ExifExtractor, ExifRecord};
use crate::shared::context::{AppConfig, ServiceContext};
use crate::shared::kv::fake::FakeKv;
use crate::shared::kv::Kv;
use crate::variants::fake::FakeVariants;
use crate::variants::Variants;

fn test_config() -> AppConfig {
    AppConfig {
        sync_page_size: 1000,
        access_chunk_size: 500,
        sync_stale_days: 30,
        quota_default_bytes: None,
    }
}

/// Builds a `ServiceContext` wired entirely to in-memory fakes, for unit
/// tests that exercise a service's business logic without touching Postgres
/// or Redis. Swap in a `MockDatabase`-backed connection via `with_db` for
/// tests that need to assert on the queries a repo issues.
pub struct TestContextBuilder {
    db: DatabaseConnection,
    blob_store: Arc<dyn BlobStore>,
    kv: Arc<dyn Kv>,
    exif: Arc<dyn ExifExtractor>,
    variants: Arc<dyn Variants>,
    config: AppConfig,
}

impl Default for TestContextBuilder {
    fn default() -> Self {
        Self {
            db: MockDatabase::new(sea_orm::DatabaseBackend::Postgres).into_connection(),
            blob_store: Arc::new(FakeBlobStore::new()),
            kv: Arc::new(FakeKv::default()),
            exif: Arc::new(FakeExifExtractor(ExifRecord::default())),
            variants: Arc::new(FakeVariants::default()),
            config: test_config(),
        }
    }
}

impl TestContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(mut self, db: DatabaseConnection) -> Self {
        self.db = db;
        self
    }

    pub fn with_blob_store(mut self, blob_store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = blob_store;
        self
    }

    pub fn with_exif(mut self, record: ExifRecord) -> Self {
        self.exif = Arc::new(FakeExifExtractor(record));
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> ServiceContext {
        ServiceContext::new(self.db, self.blob_store, self.kv, self.exif, self.variants, self.config)
    }
}

/// Convenience: a `MockDatabase` connection that returns `rows` (one page of
/// `FromQueryResult`-shaped results) for every query issued against it, and
/// reports `affected` rows for every exec. Good enough for a single
/// repo-function-under-test; tests touching more than one query shape should
/// chain `.append_query_results` themselves instead of using this helper.
pub fn mock_db_with_exec_result(affected: u64) -> DatabaseConnection {
    MockDatabase::new(sea_orm::DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: affected,
        }])
        .into_connection()
}
