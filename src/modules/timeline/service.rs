use uuid::Uuid;

use crate::entity::asset;
use crate::modules::access::queries as access_queries;
use crate::shared::context::ServiceContext;
use crate::shared::error::AppResult;

use super::domain::{BucketOrder, TimeBucket, TimeBucketAssets, TimeBucketFilters};
use super::repo;

pub struct TimelineService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TimelineService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn time_buckets(&self, filters: &TimeBucketFilters, order: BucketOrder) -> AppResult<Vec<TimeBucket>> {
        repo::time_buckets(&self.ctx.db, filters, order).await
    }

    pub async fn time_bucket(&self, filters: &TimeBucketFilters, bucket: &str) -> AppResult<TimeBucketAssets> {
        let rows = repo::time_bucket_assets(&self.ctx.db, filters, bucket).await?;
        let mut out = TimeBucketAssets::default();
        for row in rows {
            out.push(row);
        }
        Ok(out)
    }

    pub async fn unique_original_paths(&self, owner_id: Uuid) -> AppResult<Vec<String>> {
        repo::unique_original_paths(&self.ctx.db, owner_id).await
    }

    pub async fn assets_by_original_path(&self, owner_id: Uuid, path: &str) -> AppResult<Vec<asset::Model>> {
        repo::assets_by_original_path(&self.ctx.db, owner_id, path).await
    }

    /// `getRandom(count)` — visible-user set is self plus timeline-sharing
    /// partners (§4.7, grounded on the same partner union the AccessGuard
    /// uses for cross-user `asset.read`).
    pub async fn random(&self, self_id: Uuid, count: u64) -> AppResult<Vec<asset::Model>> {
        let owner_ids = access_queries::visible_owner_ids(&self.ctx.db, self_id).await?;
        repo::random_assets(&self.ctx.db, &owner_ids, count).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::entity::asset::{AssetStatus, AssetType, AssetVisibility};
    use crate::test_helpers::TestContextBuilder;

    use super::*;

    fn sample_asset(owner_id: Uuid, original_path: &str) -> asset::Model {
        let now = chrono::Utc::now().into();
        asset::Model {
            id: Uuid::new_v4(),
            owner_id,
            library_id: None,
            checksum: vec![1, 2, 3],
            original_path: original_path.into(),
            original_file_name: "img.jpg".into(),
            device_asset_id: "device-asset".into(),
            device_id: "device".into(),
            r#type: AssetType::Image,
            visibility: AssetVisibility::Timeline,
            is_favorite: false,
            file_created_at: now,
            file_modified_at: now,
            local_date_time: now,
            file_size_in_byte: 1024,
            duration_in_seconds: None,
            width: Some(100),
            height: Some(50),
            thumbhash: None,
            live_photo_video_id: None,
            stack_id: None,
            status: AssetStatus::Active,
            deleted_at: None,
            updated_at: now,
            update_id: Uuid::new_v4(),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn assets_by_original_path_returns_the_matching_rows() {
        let owner = Uuid::new_v4();
        let asset = sample_asset(owner, "Albums/2024/img.jpg");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![asset.clone()]])
            .into_connection();

        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = TimelineService::new(&ctx);

        let rows = service
            .assets_by_original_path(owner, "Albums/2024/")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, asset.id);
    }
}
