//! Trash (§4.8) queries. Row-at-a-time updates, not `update_many`, because
//! each trashed/restored row needs its own fresh `update_id` — sync's
//! ascending-per-type ordering invariant (§5) would break if a batch shared
//! one watermark.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{
    activity, album_asset, asset, asset_exif, asset_file, asset_metadata, audit, memory_asset,
    shared_link_asset, tag_asset,
};
use crate::modules::assets::repo::increment_quota_usage;
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

/// Moves `ids` into `status = trashed` and writes one `asset_audit` row per
/// asset — sync clients see this as an `AssetDeleteV1`, even though the live
/// row survives for the trash UI and `restore`. Ids already outside
/// `status = active` are silently skipped (already trashed/deleted).
pub async fn soft_delete(db: &DatabaseConnection, ids: &[Uuid]) -> AppResult<u64> {
    let txn = db.begin().await?;
    let now = Utc::now();

    let rows = asset::Entity::find()
        .filter(asset::Column::Id.is_in(ids.to_vec()))
        .filter(asset::Column::Status.eq(asset::AssetStatus::Active))
        .all(&txn)
        .await?;

    for row in &rows {
        let mut am: asset::ActiveModel = row.clone().into();
        am.status = Set(asset::AssetStatus::Trashed);
        am.deleted_at = Set(Some(now.into()));
        am.update_id = Set(new_id());
        am.update(&txn).await?;

        audit::asset_audit::ActiveModel {
            id: Set(new_id()),
            owner_id: Set(row.owner_id),
            asset_id: Set(row.id),
            deleted_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(rows.len() as u64)
}

/// Restores trashed assets back to `active`. `ids = None` restores every
/// trashed asset the user owns. Each restored row gets a fresh `update_id`
/// so the next sync scan re-upserts it — it was reported deleted when it
/// was trashed, so it must reappear as a genuine upsert, not be silently
/// skipped as unchanged.
pub async fn restore(db: &DatabaseConnection, owner_id: Uuid, ids: Option<&[Uuid]>) -> AppResult<u64> {
    let mut query = asset::Entity::find()
        .filter(asset::Column::OwnerId.eq(owner_id))
        .filter(asset::Column::Status.eq(asset::AssetStatus::Trashed));
    if let Some(ids) = ids {
        query = query.filter(asset::Column::Id.is_in(ids.to_vec()));
    }
    let rows = query.all(db).await?;

    for row in &rows {
        let mut am: asset::ActiveModel = row.clone().into();
        am.status = Set(asset::AssetStatus::Active);
        am.deleted_at = Set(None);
        am.update_id = Set(new_id());
        am.update(db).await?;
    }

    Ok(rows.len() as u64)
}

/// One asset hard-deleted by `empty`, with enough to reclaim its blobs and
/// quota after the relational transaction commits.
pub struct PurgedAsset {
    pub owner_id: Uuid,
    pub file_size_in_byte: i64,
    pub blob_keys: Vec<String>,
}

/// Hard-deletes every `status = trashed` asset the user owns: blob keys are
/// collected for the caller to reap concurrently, child rows (exif, files,
/// metadata, tag/album/shared-link/memory links, activities) are
/// cascade-deleted, and quota usage is reclaimed. No new `asset_audit` row
/// is written here — the delete was already reported to sync clients when
/// the asset was trashed.
pub async fn empty(db: &DatabaseConnection, owner_id: Uuid) -> AppResult<Vec<PurgedAsset>> {
    let txn = db.begin().await?;

    let trashed = asset::Entity::find()
        .filter(asset::Column::OwnerId.eq(owner_id))
        .filter(asset::Column::Status.eq(asset::AssetStatus::Trashed))
        .all(&txn)
        .await?;

    let mut purged = Vec::with_capacity(trashed.len());
    for a in trashed {
        let files = asset_file::Entity::find()
            .filter(asset_file::Column::AssetId.eq(a.id))
            .all(&txn)
            .await?;
        let mut blob_keys: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        blob_keys.push(a.original_path.clone());

        asset_file::Entity::delete_many()
            .filter(asset_file::Column::AssetId.eq(a.id))
            .exec(&txn)
            .await?;
        asset_exif::Entity::delete_many()
            .filter(asset_exif::Column::AssetId.eq(a.id))
            .exec(&txn)
            .await?;
        asset_metadata::Entity::delete_many()
            .filter(asset_metadata::Column::AssetId.eq(a.id))
            .exec(&txn)
            .await?;
        tag_asset::Entity::delete_many()
            .filter(tag_asset::Column::AssetId.eq(a.id))
            .exec(&txn)
            .await?;
        album_asset::Entity::delete_many()
            .filter(album_asset::Column::AssetId.eq(a.id))
            .exec(&txn)
            .await?;
        shared_link_asset::Entity::delete_many()
            .filter(shared_link_asset::Column::AssetId.eq(a.id))
            .exec(&txn)
            .await?;
        memory_asset::Entity::delete_many()
            .filter(memory_asset::Column::AssetId.eq(a.id))
            .exec(&txn)
            .await?;
        activity::Entity::delete_many()
            .filter(activity::Column::AssetId.eq(a.id))
            .exec(&txn)
            .await?;

        asset::Entity::delete_by_id(a.id).exec(&txn).await?;
        increment_quota_usage(&txn, a.owner_id, -a.file_size_in_byte).await?;

        purged.push(PurgedAsset {
            owner_id: a.owner_id,
            file_size_in_byte: a.file_size_in_byte,
            blob_keys,
        });
    }

    txn.commit().await?;
    Ok(purged)
}
