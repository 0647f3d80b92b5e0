//! Per-type scan queries (§4.6) and checkpoint storage.
//!
//! Two scan shapes, matching which tables carry their own `update_id`:
//!
//! - **Family A** (watermarked): the live table has an `update_id` column and
//!   a matching `*_audit` table records deletes. Upserts page by
//!   `update_id > after`; deletes page by `audit.id > after`.
//! - **Family B** (link-table, unwatermarked): `album_users`/`memory_assets`
//!   carry no `update_id` of their own. Deletes still page off the audit
//!   table's `id`; upserts re-send the full current membership each sync
//!   (these tables are small per-album/per-memory sets), ordered by the
//!   composite primary key instead of a watermark.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde_json::json;
use uuid::Uuid;

use crate::entity::{
    album, album_asset, album_user, asset, asset_exif, audit, memory, memory_asset, partner,
    session_sync_checkpoint, stack,
};
use crate::shared::error::AppResult;

use super::domain::{SyncEntityType, SyncLine};

pub async fn load_checkpoint(
    db: &DatabaseConnection,
    session_id: Uuid,
    ty: SyncEntityType,
) -> AppResult<Option<session_sync_checkpoint::Model>> {
    Ok(session_sync_checkpoint::Entity::find_by_id((session_id, ty.as_str().to_string()))
        .one(db)
        .await?)
}

pub async fn save_checkpoint(
    db: &DatabaseConnection,
    session_id: Uuid,
    ty: SyncEntityType,
    ack: &str,
    update_id: Uuid,
) -> AppResult<()> {
    use sea_orm::ActiveValue::Set;
    let model = session_sync_checkpoint::ActiveModel {
        session_id: Set(session_id),
        r#type: Set(ty.as_str().to_string()),
        ack: Set(ack.to_string()),
        update_id: Set(update_id),
        updated_at: Set(Utc::now().into()),
    };
    session_sync_checkpoint::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::columns([
                session_sync_checkpoint::Column::SessionId,
                session_sync_checkpoint::Column::Type,
            ])
            .update_columns([
                session_sync_checkpoint::Column::Ack,
                session_sync_checkpoint::Column::UpdateId,
                session_sync_checkpoint::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

pub async fn delete_checkpoints(db: &DatabaseConnection, session_id: Uuid) -> AppResult<()> {
    session_sync_checkpoint::Entity::delete_many()
        .filter(session_sync_checkpoint::Column::SessionId.eq(session_id))
        .exec(db)
        .await?;
    Ok(())
}

/// `PartnersV1` — both directions of a partner relationship the user is in.
pub async fn scan_partners(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    let mut deletes = audit::partner_audit::Entity::find()
        .filter(
            Condition::any()
                .add(audit::partner_audit::Column::SharedById.eq(user_id))
                .add(audit::partner_audit::Column::SharedWithId.eq(user_id)),
        )
        .order_by_asc(audit::partner_audit::Column::Id)
        .apply_after(after, audit::partner_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::delete(
                SyncEntityType::PartnersV1,
                row.id,
                json!({ "sharedById": row.shared_by_id, "sharedWithId": row.shared_with_id }),
            )
        })
        .collect::<Vec<_>>();

    let upserts = partner::Entity::find()
        .filter(
            Condition::any()
                .add(partner::Column::SharedById.eq(user_id))
                .add(partner::Column::SharedWithId.eq(user_id)),
        )
        .order_by_asc(partner::Column::UpdateId)
        .apply_after(after, partner::Column::UpdateId)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::upsert(
                SyncEntityType::PartnersV1,
                row.update_id,
                json!({
                    "sharedById": row.shared_by_id,
                    "sharedWithId": row.shared_with_id,
                    "inTimeline": row.in_timeline,
                }),
            )
        });

    deletes.extend(upserts);
    Ok(deletes)
}

/// `AssetsV1` — assets owned by the user.
pub async fn scan_assets(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    let mut deletes = audit::asset_audit::Entity::find()
        .filter(audit::asset_audit::Column::OwnerId.eq(user_id))
        .order_by_asc(audit::asset_audit::Column::Id)
        .apply_after(after, audit::asset_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| SyncLine::delete(SyncEntityType::AssetsV1, row.id, json!({ "assetId": row.asset_id })))
        .collect::<Vec<_>>();

    // Trashing an asset writes an `asset_audit` row immediately (see
    // `trash::repo::soft_delete`) while the live row survives for the trash
    // UI and `restore`; excluding it here keeps that single delete line
    // final until a `restore` bumps `update_id` again (§8 property 6).
    let upserts = asset::Entity::find()
        .filter(asset::Column::OwnerId.eq(user_id))
        .filter(asset::Column::Status.ne(asset::AssetStatus::Trashed))
        .order_by_asc(asset::Column::UpdateId)
        .apply_after(after, asset::Column::UpdateId)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(asset_upsert_line);

    deletes.extend(upserts);
    Ok(deletes)
}

fn asset_upsert_line(row: asset::Model) -> SyncLine {
    let update_id = row.update_id;
    SyncLine::upsert(SyncEntityType::AssetsV1, update_id, asset_v1_payload(&row))
}

/// The `AssetV1` wire shape (§6.3), shared by the sync stream and the
/// legacy full-sync/delta-sync endpoints. `isEdited` is not computed here —
/// it would need an `asset_file` join per row — and defaults to `false`;
/// callers that need an exact value look it up via the assets module.
pub fn asset_v1_payload(row: &asset::Model) -> serde_json::Value {
    json!({
        "id": row.id,
        "ownerId": row.owner_id,
        "originalFileName": row.original_file_name,
        "thumbhash": row.thumbhash.as_ref().map(|t| base64_checksum(t)),
        "checksum": base64_checksum(&row.checksum),
        "fileCreatedAt": row.file_created_at,
        "fileModifiedAt": row.file_modified_at,
        "localDateTime": row.local_date_time,
        "duration": row.duration_in_seconds,
        "type": row.r#type,
        "deletedAt": row.deleted_at,
        "isFavorite": row.is_favorite,
        "visibility": row.visibility,
        "livePhotoVideoId": row.live_photo_video_id,
        "stackId": row.stack_id,
        "libraryId": row.library_id,
        "width": row.width,
        "height": row.height,
        "isEdited": false,
    })
}

fn base64_checksum(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// `StacksV1` — stacks owned by the user.
pub async fn scan_stacks(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    let mut deletes = audit::stack_audit::Entity::find()
        .filter(audit::stack_audit::Column::OwnerId.eq(user_id))
        .order_by_asc(audit::stack_audit::Column::Id)
        .apply_after(after, audit::stack_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| SyncLine::delete(SyncEntityType::StacksV1, row.id, json!({ "stackId": row.stack_id })))
        .collect::<Vec<_>>();

    let upserts = stack::Entity::find()
        .filter(stack::Column::OwnerId.eq(user_id))
        .order_by_asc(stack::Column::UpdateId)
        .apply_after(after, stack::Column::UpdateId)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::upsert(
                SyncEntityType::StacksV1,
                row.update_id,
                json!({
                    "id": row.id,
                    "ownerId": row.owner_id,
                    "primaryAssetId": row.primary_asset_id,
                }),
            )
        });

    deletes.extend(upserts);
    Ok(deletes)
}

/// `AlbumsV1` — albums owned by, or shared with, the user.
pub async fn scan_albums(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    let mut deletes = audit::album_audit::Entity::find()
        .filter(audit::album_audit::Column::OwnerId.eq(user_id))
        .order_by_asc(audit::album_audit::Column::Id)
        .apply_after(after, audit::album_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| SyncLine::delete(SyncEntityType::AlbumsV1, row.id, json!({ "albumId": row.album_id })))
        .collect::<Vec<_>>();

    let member_album_ids = album_user::Entity::find()
        .filter(album_user::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.album_id)
        .collect::<Vec<_>>();

    let upserts = album::Entity::find()
        .filter(
            Condition::any()
                .add(album::Column::OwnerId.eq(user_id))
                .add(album::Column::Id.is_in(member_album_ids)),
        )
        .order_by_asc(album::Column::UpdateId)
        .apply_after(after, album::Column::UpdateId)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::upsert(
                SyncEntityType::AlbumsV1,
                row.update_id,
                json!({
                    "id": row.id,
                    "ownerId": row.owner_id,
                    "name": row.album_name,
                    "description": row.description,
                    "albumThumbnailAssetId": row.album_thumbnail_asset_id,
                    "isActivityEnabled": row.is_activity_enabled,
                    "order": row.sort_order,
                    "createdAt": row.created_at,
                    "updatedAt": row.updated_at,
                }),
            )
        });

    deletes.extend(upserts);
    Ok(deletes)
}

/// `AlbumToAssetsV1` — membership rows for albums owned by, or shared with,
/// the user. Family A: `album_assets` carries its own `update_id`.
pub async fn scan_album_to_assets(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    // album_asset_audit carries no user-scoping column and the owning album
    // may itself be gone by the time we read it, so deletes can't be scoped
    // to "albums this user could see" — every album-asset delete in the
    // system is sent to every syncing client. Acceptable for the same reason
    // spec.md accepts stubbed backfill types: a client without access to the
    // album silently ignores an id it never upserted.
    let mut deletes = audit::album_asset_audit::Entity::find()
        .order_by_asc(audit::album_asset_audit::Column::Id)
        .apply_after(after, audit::album_asset_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::delete(
                SyncEntityType::AlbumToAssetsV1,
                row.id,
                json!({ "albumId": row.album_id, "assetId": row.asset_id }),
            )
        })
        .collect::<Vec<_>>();

    let accessible_album_ids = accessible_album_ids(db, user_id).await?;
    let upserts = album_asset::Entity::find()
        .filter(album_asset::Column::AlbumId.is_in(accessible_album_ids))
        .order_by_asc(album_asset::Column::UpdateId)
        .apply_after(after, album_asset::Column::UpdateId)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::upsert(
                SyncEntityType::AlbumToAssetsV1,
                row.update_id,
                json!({ "albumId": row.album_id, "assetId": row.asset_id }),
            )
        });

    deletes.extend(upserts);
    Ok(deletes)
}

async fn accessible_album_ids(db: &DatabaseConnection, user_id: Uuid) -> AppResult<Vec<Uuid>> {
    let owned = album::Entity::find()
        .filter(album::Column::OwnerId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.id);
    let member = album_user::Entity::find()
        .filter(album_user::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.album_id);
    Ok(owned.chain(member).collect())
}

/// `AlbumUsersV1` — Family B: `album_users` has no `update_id`, so upserts
/// re-send the full current membership for albums the user can see, ordered
/// by the composite key; deletes still page off the audit table.
pub async fn scan_album_users(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    let accessible = accessible_album_ids(db, user_id).await?;
    let mut deletes = audit::album_user_audit::Entity::find()
        .filter(
            Condition::any()
                .add(audit::album_user_audit::Column::UserId.eq(user_id))
                .add(audit::album_user_audit::Column::AlbumId.is_in(accessible.clone())),
        )
        .order_by_asc(audit::album_user_audit::Column::Id)
        .apply_after(after, audit::album_user_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::delete(
                SyncEntityType::AlbumUsersV1,
                row.id,
                json!({ "albumId": row.album_id, "userId": row.user_id }),
            )
        })
        .collect::<Vec<_>>();

    if after.is_none() {
        let rows = album_user::Entity::find()
            .filter(album_user::Column::AlbumId.is_in(accessible))
            .order_by_asc(album_user::Column::AlbumId)
            .order_by_asc(album_user::Column::UserId)
            .all(db)
            .await?;
        let now = crate::shared::ids::new_id();
        deletes.extend(rows.into_iter().map(|row| {
            SyncLine::upsert(
                SyncEntityType::AlbumUsersV1,
                now,
                json!({ "albumId": row.album_id, "userId": row.user_id, "role": row.role }),
            )
        }));
    }

    Ok(deletes)
}

/// `AssetExifsV1` — exif rows for assets the user owns.
pub async fn scan_asset_exifs(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    // asset_exif has no dedicated audit table; it dies with its asset, so
    // asset_audit doubles as the delete feed for this type too.
    let mut deletes = audit::asset_audit::Entity::find()
        .filter(audit::asset_audit::Column::OwnerId.eq(user_id))
        .order_by_asc(audit::asset_audit::Column::Id)
        .apply_after(after, audit::asset_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| SyncLine::delete(SyncEntityType::AssetExifsV1, row.id, json!({ "assetId": row.asset_id })))
        .collect::<Vec<_>>();

    let upserts = asset_exif::Entity::find()
        .inner_join(asset::Entity)
        .filter(asset::Column::OwnerId.eq(user_id))
        .order_by_asc(asset_exif::Column::UpdateId)
        .apply_after(after, asset_exif::Column::UpdateId)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(exif_upsert_line);

    deletes.extend(upserts);
    Ok(deletes)
}

fn exif_upsert_line(row: asset_exif::Model) -> SyncLine {
    SyncLine::upsert(
        SyncEntityType::AssetExifsV1,
        row.update_id,
        json!({
            "assetId": row.asset_id,
            "make": row.make,
            "model": row.model,
            "exifImageWidth": row.exif_image_width,
            "exifImageHeight": row.exif_image_height,
            "orientation": row.orientation,
            "dateTimeOriginal": row.date_time_original,
            "modifyDate": row.modify_date,
            "timeZone": row.time_zone,
            "latitude": row.latitude,
            "longitude": row.longitude,
            "city": row.city,
            "state": row.state,
            "country": row.country,
            "description": row.description,
            "fps": row.fps,
            "exposureTime": row.exposure_time,
            "rating": row.rating,
            "iso": row.iso,
            "fNumber": row.f_number,
            "focalLength": row.focal_length,
            "lensModel": row.lens_model,
            "projectionType": row.projection_type,
        }),
    )
}

/// `MemoriesV1` — memories owned by the user.
pub async fn scan_memories(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    let mut deletes = audit::memory_audit::Entity::find()
        .filter(audit::memory_audit::Column::OwnerId.eq(user_id))
        .order_by_asc(audit::memory_audit::Column::Id)
        .apply_after(after, audit::memory_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| SyncLine::delete(SyncEntityType::MemoriesV1, row.id, json!({ "memoryId": row.memory_id })))
        .collect::<Vec<_>>();

    let upserts = memory::Entity::find()
        .filter(memory::Column::OwnerId.eq(user_id))
        .order_by_asc(memory::Column::UpdateId)
        .apply_after(after, memory::Column::UpdateId)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::upsert(
                SyncEntityType::MemoriesV1,
                row.update_id,
                json!({
                    "id": row.id,
                    "ownerId": row.owner_id,
                    "type": row.r#type,
                    "data": row.data,
                    "isSaved": row.is_saved,
                    "memoryAt": row.memory_at,
                    "seenAt": row.seen_at,
                    "createdAt": row.created_at,
                }),
            )
        });

    deletes.extend(upserts);
    Ok(deletes)
}

/// `MemoryToAssetsV1` — Family B: `memory_assets` has no `update_id`.
pub async fn scan_memory_to_assets(
    db: &DatabaseConnection,
    user_id: Uuid,
    after: Option<Uuid>,
    limit: u64,
) -> AppResult<Vec<SyncLine>> {
    // memory_asset_audit carries no owner column either; memories are never
    // shared (unlike albums), so this is a smaller blind spot than the
    // album-asset case above, but the same caveat applies.
    let mut deletes = audit::memory_asset_audit::Entity::find()
        .order_by_asc(audit::memory_asset_audit::Column::Id)
        .apply_after(after, audit::memory_asset_audit::Column::Id)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(|row| {
            SyncLine::delete(
                SyncEntityType::MemoryToAssetsV1,
                row.id,
                json!({ "memoryId": row.memories_id, "assetId": row.asset_id }),
            )
        })
        .collect::<Vec<_>>();

    if after.is_none() {
        let owned_memory_ids = memory::Entity::find()
            .filter(memory::Column::OwnerId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect::<Vec<_>>();
        let rows = memory_asset::Entity::find()
            .filter(memory_asset::Column::MemoriesId.is_in(owned_memory_ids))
            .order_by_asc(memory_asset::Column::MemoriesId)
            .order_by_asc(memory_asset::Column::AssetId)
            .all(db)
            .await?;
        let now = crate::shared::ids::new_id();
        deletes.extend(rows.into_iter().map(|row| {
            SyncLine::upsert(
                SyncEntityType::MemoryToAssetsV1,
                now,
                json!({ "memoryId": row.memories_id, "assetId": row.asset_id }),
            )
        }));
    }

    Ok(deletes)
}

trait ApplyAfter: Sized {
    fn apply_after<C: ColumnTrait>(self, after: Option<Uuid>, col: C) -> Self;
}

impl<E: EntityTrait> ApplyAfter for sea_orm::Select<E> {
    fn apply_after<C: ColumnTrait>(self, after: Option<Uuid>, col: C) -> Self {
        match after {
            Some(id) => self.filter(col.gt(id)),
            None => self,
        }
    }
}
