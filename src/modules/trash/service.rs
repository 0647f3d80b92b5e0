use uuid::Uuid;

use crate::shared::context::ServiceContext;
use crate::shared::error::AppResult;

use super::domain::CountResult;
use super::repo;

pub struct TrashService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TrashService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// `DELETE assets [id]` (§8 property 5): moves assets into `trashed`.
    /// Access (`asset.delete`) is checked by the route before this runs.
    pub async fn soft_delete(&self, ids: &[Uuid]) -> AppResult<CountResult> {
        let count = repo::soft_delete(&self.ctx.db, ids).await?;
        Ok(CountResult { count })
    }

    pub async fn restore(&self, owner_id: Uuid, ids: Option<&[Uuid]>) -> AppResult<CountResult> {
        let count = repo::restore(&self.ctx.db, owner_id, ids).await?;
        Ok(CountResult { count })
    }

    /// `empty(user)` (§4.8): hard-deletes every trashed asset, then fires
    /// off blob deletion concurrently — failures are swallowed, matching
    /// §9 (a janitor is expected to reap any stragglers).
    pub async fn empty(&self, owner_id: Uuid) -> AppResult<CountResult> {
        let purged = repo::empty(&self.ctx.db, owner_id).await?;
        let count = purged.len() as u64;

        let deletes = purged.iter().flat_map(|p| p.blob_keys.iter()).map(|key| {
            let store = self.ctx.blob_store.clone();
            let key = key.clone();
            async move {
                let _ = store.delete(&key).await;
            }
        });
        futures::future::join_all(deletes).await;

        Ok(CountResult { count })
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::entity::asset::{AssetStatus, AssetType, AssetVisibility};
    use crate::test_helpers::TestContextBuilder;

    use super::*;

    fn sample_asset(owner_id: Uuid, status: AssetStatus) -> crate::entity::asset::Model {
        let now = chrono::Utc::now().into();
        crate::entity::asset::Model {
            id: Uuid::new_v4(),
            owner_id,
            library_id: None,
            checksum: vec![1, 2, 3],
            original_path: "orig/path.jpg".into(),
            original_file_name: "path.jpg".into(),
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
            width: None,
            height: None,
            thumbhash: None,
            live_photo_video_id: None,
            stack_id: None,
            status,
            deleted_at: None,
            updated_at: now,
            update_id: Uuid::new_v4(),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn soft_delete_moves_active_asset_to_trashed_and_writes_audit_row() {
        let owner = Uuid::new_v4();
        let asset = sample_asset(owner, AssetStatus::Active);
        let asset_id = asset.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![asset]])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ])
            .into_connection();

        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = TrashService::new(&ctx);

        let result = service.soft_delete(&[asset_id]).await.unwrap();
        assert_eq!(result.count, 1);
    }

    #[tokio::test]
    async fn soft_delete_counts_zero_when_nothing_matches() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::entity::asset::Model>::new()])
            .into_connection();

        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = TrashService::new(&ctx);

        let result = service.soft_delete(&[Uuid::new_v4()]).await.unwrap();
        assert_eq!(result.count, 0);
    }

    #[tokio::test]
    async fn restore_reactivates_trashed_asset() {
        let owner = Uuid::new_v4();
        let asset = sample_asset(owner, AssetStatus::Trashed);
        let asset_id = asset.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![asset]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = TrashService::new(&ctx);

        let result = service.restore(owner, Some(&[asset_id])).await.unwrap();
        assert_eq!(result.count, 1);
    }

    #[tokio::test]
    async fn empty_with_no_trashed_assets_purges_nothing() {
        let owner = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::entity::asset::Model>::new()])
            .into_connection();

        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = TrashService::new(&ctx);

        let result = service.empty(owner).await.unwrap();
        assert_eq!(result.count, 0);
    }
}
