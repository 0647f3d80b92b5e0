use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, QueryFilter, Statement,
};
use serde_json::json;
use uuid::Uuid;

use crate::entity::{asset, asset_exif, asset_file, asset_metadata, user};
use crate::exif::ExifRecord;
use crate::shared::error::AppResult;
use crate::shared::ids::new_id;

pub async fn find_by_checksum(
    db: &DatabaseConnection,
    owner_id: Uuid,
    library_id: Option<Uuid>,
    checksum: &[u8],
) -> AppResult<Option<asset::Model>> {
    let found = asset::Entity::find()
        .filter(asset::Column::OwnerId.eq(owner_id))
        .filter(asset::Column::LibraryId.eq(library_id))
        .filter(asset::Column::Checksum.eq(checksum.to_vec()))
        .filter(asset::Column::Status.ne(asset::AssetStatus::Deleted))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<asset::Model>> {
    Ok(asset::Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_device_asset_ids(
    db: &DatabaseConnection,
    owner_id: Uuid,
    device_id: &str,
    device_asset_ids: &[String],
) -> AppResult<Vec<String>> {
    let rows = asset::Entity::find()
        .filter(asset::Column::OwnerId.eq(owner_id))
        .filter(asset::Column::DeviceId.eq(device_id))
        .filter(asset::Column::DeviceAssetId.is_in(device_asset_ids.to_vec()))
        .filter(asset::Column::Status.ne(asset::AssetStatus::Deleted))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|a| a.device_asset_id).collect())
}

/// Inserts a new asset row inside an open transaction; the caller commits
/// after the blob write has already succeeded (§4.4 step 5-6).
#[allow(clippy::too_many_arguments)]
pub async fn insert_asset<C: ConnectionTrait>(
    conn: &C,
    asset_id: Uuid,
    owner_id: Uuid,
    library_id: Option<Uuid>,
    checksum: Vec<u8>,
    original_path: String,
    input: &super::domain::NewAssetInput,
    asset_type: asset::AssetType,
    file_size_in_byte: i64,
) -> AppResult<asset::Model> {
    let active = asset::ActiveModel {
        id: Set(asset_id),
        owner_id: Set(owner_id),
        library_id: Set(library_id),
        checksum: Set(checksum),
        original_path: Set(original_path),
        original_file_name: Set(input.original_file_name.clone()),
        device_asset_id: Set(input.device_asset_id.clone()),
        device_id: Set(input.device_id.clone()),
        r#type: Set(asset_type),
        visibility: Set(super::domain::default_visibility()),
        is_favorite: Set(input.is_favorite),
        file_created_at: Set(input.file_created_at),
        file_modified_at: Set(input.file_modified_at),
        local_date_time: Set(input.local_date_time),
        file_size_in_byte: Set(file_size_in_byte),
        duration_in_seconds: Set(input.duration_in_seconds),
        width: Set(None),
        height: Set(None),
        thumbhash: Set(None),
        live_photo_video_id: Set(None),
        stack_id: Set(None),
        status: Set(super::domain::default_status()),
        deleted_at: Set(None),
        updated_at: Set(chrono::Utc::now().into()),
        update_id: Set(new_id()),
        created_at: Set(chrono::Utc::now().into()),
    };
    Ok(active.insert(conn).await?)
}

/// Upserts the EXIF row for an asset. `locked_behavior = "override"` (ingest)
/// overwrites every field; `"append"` (metadata update) additionally adds the
/// field names present in `written_fields` to `locked_properties` so later
/// extractor runs never clobber them (§4.4 "Update metadata").
pub async fn upsert_exif_from_extraction(
    db: &DatabaseConnection,
    asset_id: Uuid,
    width: Option<i32>,
    height: Option<i32>,
    record: &ExifRecord,
) -> AppResult<()> {
    let active = asset_exif::ActiveModel {
        asset_id: Set(asset_id),
        make: Set(record.make.clone()),
        model: Set(record.model.clone()),
        exif_image_width: Set(width.or(record.exif_image_width)),
        exif_image_height: Set(height.or(record.exif_image_height)),
        orientation: Set(record.orientation.clone()),
        date_time_original: Set(record.date_time_original.map(|d| d.into())),
        modify_date: Set(record.modify_date.map(|d| d.into())),
        time_zone: Set(record.time_zone.clone()),
        latitude: Set(record.latitude),
        longitude: Set(record.longitude),
        projection_type: Set(None),
        city: Set(None),
        state: Set(None),
        country: Set(None),
        description: Set(record.description.clone()),
        fps: Set(None),
        exposure_time: Set(record.exposure_time.clone()),
        rating: Set(record.rating.map(|r| r as i16)),
        iso: Set(record.iso),
        f_number: Set(record.f_number),
        focal_length: Set(record.focal_length),
        lens_model: Set(record.lens_model.clone()),
        live_photo_cid: Set(None),
        auto_stack_id: Set(None),
        colorspace: Set(None),
        bits_per_sample: Set(None),
        profile_description: Set(None),
        tags: Set(None),
        locked_properties: Set(json!([])),
        update_id: Set(new_id()),
    };

    asset_exif::Entity::insert(active)
        .on_conflict(
            OnConflict::column(asset_exif::Column::AssetId)
                .update_columns([
                    asset_exif::Column::Make,
                    asset_exif::Column::Model,
                    asset_exif::Column::ExifImageWidth,
                    asset_exif::Column::ExifImageHeight,
                    asset_exif::Column::Orientation,
                    asset_exif::Column::DateTimeOriginal,
                    asset_exif::Column::ModifyDate,
                    asset_exif::Column::TimeZone,
                    asset_exif::Column::Latitude,
                    asset_exif::Column::Longitude,
                    asset_exif::Column::Description,
                    asset_exif::Column::ExposureTime,
                    asset_exif::Column::Rating,
                    asset_exif::Column::Iso,
                    asset_exif::Column::FNumber,
                    asset_exif::Column::FocalLength,
                    asset_exif::Column::LensModel,
                    asset_exif::Column::UpdateId,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

/// Applies a partial metadata-update patch (§4.4 "Update metadata"), locking
/// each touched field so the next best-effort extractor run leaves it alone.
pub async fn apply_exif_patch(
    db: &DatabaseConnection,
    asset_id: Uuid,
    patch: &[(&str, serde_json::Value)],
) -> AppResult<()> {
    if patch.is_empty() {
        return Ok(());
    }
    let existing = asset_exif::Entity::find_by_id(asset_id).one(db).await?;
    let mut active: asset_exif::ActiveModel = match existing {
        Some(row) => row.into(),
        None => asset_exif::ActiveModel {
            asset_id: Set(asset_id),
            locked_properties: Set(json!([])),
            update_id: Set(new_id()),
            ..sea_orm::ActiveModelTrait::default()
        },
    };

    let mut locked: Vec<String> = match &active.locked_properties {
        sea_orm::ActiveValue::Set(v) | sea_orm::ActiveValue::Unchanged(v) => {
            serde_json::from_value(v.clone()).unwrap_or_default()
        }
        sea_orm::ActiveValue::NotSet => Vec::new(),
    };

    for (field, value) in patch {
        apply_single_exif_field(&mut active, field, value.clone());
        if !locked.contains(&field.to_string()) {
            locked.push(field.to_string());
        }
    }
    active.locked_properties = Set(json!(locked));
    active.update_id = Set(new_id());

    asset_exif::Entity::insert(active)
        .on_conflict(OnConflict::column(asset_exif::Column::AssetId).update_columns([
            asset_exif::Column::DateTimeOriginal,
            asset_exif::Column::TimeZone,
            asset_exif::Column::Latitude,
            asset_exif::Column::Longitude,
            asset_exif::Column::Description,
            asset_exif::Column::Rating,
            asset_exif::Column::LockedProperties,
            asset_exif::Column::UpdateId,
        ]).to_owned())
        .exec(db)
        .await?;
    Ok(())
}

fn apply_single_exif_field(active: &mut asset_exif::ActiveModel, field: &str, value: serde_json::Value) {
    match field {
        "dateTimeOriginal" => {
            if let Some(dt) = value.as_str().and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok()) {
                active.date_time_original = Set(Some(dt.into()));
            }
        }
        "timeZone" => active.time_zone = Set(value.as_str().map(str::to_string)),
        "latitude" => active.latitude = Set(value.as_f64()),
        "longitude" => active.longitude = Set(value.as_f64()),
        "description" => active.description = Set(value.as_str().map(str::to_string)),
        "rating" => active.rating = Set(value.as_i64().map(|v| v as i16)),
        _ => {}
    }
}

pub async fn insert_asset_file<C: ConnectionTrait>(
    conn: &C,
    asset_id: Uuid,
    kind: asset_file::AssetFileType,
    path: String,
    is_edited: bool,
) -> AppResult<()> {
    let active = asset_file::ActiveModel {
        id: Set(new_id()),
        asset_id: Set(asset_id),
        r#type: Set(kind),
        path: Set(path),
        is_edited: Set(is_edited),
    };
    asset_file::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([
                asset_file::Column::AssetId,
                asset_file::Column::Type,
                asset_file::Column::IsEdited,
            ])
            .update_column(asset_file::Column::Path)
            .to_owned(),
        )
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn find_asset_file(
    db: &DatabaseConnection,
    asset_id: Uuid,
    kind: asset_file::AssetFileType,
    is_edited: bool,
) -> AppResult<Option<asset_file::Model>> {
    Ok(asset_file::Entity::find()
        .filter(asset_file::Column::AssetId.eq(asset_id))
        .filter(asset_file::Column::Type.eq(kind))
        .filter(asset_file::Column::IsEdited.eq(is_edited))
        .one(db)
        .await?)
}

pub async fn find_user(db: &DatabaseConnection, id: Uuid) -> AppResult<Option<user::Model>> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

/// Atomically bumps `quotaUsageInBytes` (§5: two concurrent uploads may both
/// pass the pre-check and commit; the resulting overshoot is accepted, §9).
pub async fn increment_quota_usage<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    delta: i64,
) -> AppResult<()> {
    user::Entity::update_many()
        .col_expr(
            user::Column::QuotaUsageInBytes,
            Expr::col(user::Column::QuotaUsageInBytes).add(delta),
        )
        .filter(user::Column::Id.eq(user_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn set_original(
    db: &DatabaseConnection,
    asset_id: Uuid,
    original_path: String,
    checksum: Vec<u8>,
    original_file_name: String,
    asset_type: asset::AssetType,
    file_size_in_byte: i64,
) -> AppResult<()> {
    let mut active = asset::ActiveModel {
        id: Set(asset_id),
        ..sea_orm::ActiveModelTrait::default()
    };
    active.original_path = Set(original_path);
    active.checksum = Set(checksum);
    active.original_file_name = Set(original_file_name);
    active.r#type = Set(asset_type);
    active.file_size_in_byte = Set(file_size_in_byte);
    active.live_photo_video_id = Set(None);
    active.updated_at = Set(chrono::Utc::now().into());
    active.update_id = Set(new_id());
    asset::Entity::update(active).exec(db).await?;
    Ok(())
}

pub async fn upsert_metadata_entry(
    db: &DatabaseConnection,
    asset_id: Uuid,
    key: String,
    value: serde_json::Value,
) -> AppResult<()> {
    let active = asset_metadata::ActiveModel {
        asset_id: Set(asset_id),
        key: Set(key),
        value: Set(value),
        updated_at: Set(chrono::Utc::now().into()),
    };
    asset_metadata::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([asset_metadata::Column::AssetId, asset_metadata::Column::Key])
                .update_columns([asset_metadata::Column::Value, asset_metadata::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

pub async fn delete_metadata_entry(db: &DatabaseConnection, asset_id: Uuid, key: &str) -> AppResult<()> {
    asset_metadata::Entity::delete_many()
        .filter(asset_metadata::Column::AssetId.eq(asset_id))
        .filter(asset_metadata::Column::Key.eq(key))
        .exec(db)
        .await?;
    Ok(())
}

/// Bulk counterpart to `delete_metadata_entry` — `DELETE /api/assets/metadata`
/// removes one `AssetMetadata` key across every listed asset in one statement
/// (no per-row watermark here, unlike the asset/exif tables: `AssetMetadata`
/// carries no `update_id` sync scans off).
pub async fn delete_metadata_entry_bulk(
    db: &DatabaseConnection,
    asset_ids: &[Uuid],
    key: &str,
) -> AppResult<u64> {
    let result = asset_metadata::Entity::delete_many()
        .filter(asset_metadata::Column::AssetId.is_in(asset_ids.to_vec()))
        .filter(asset_metadata::Column::Key.eq(key))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Bulk field patch for `PUT /api/assets/metadata` (§4.4 "Update metadata —
/// Bulk update"). Row-at-a-time, like `trash::repo` and `apply_exif_patch` —
/// each touched row needs its own fresh `update_id`.
pub async fn bulk_set_favorite_and_visibility(
    db: &DatabaseConnection,
    asset_ids: &[Uuid],
    is_favorite: Option<bool>,
    visibility: Option<asset::AssetVisibility>,
) -> AppResult<u64> {
    let mut affected = 0u64;
    for &asset_id in asset_ids {
        let mut active = asset::ActiveModel {
            id: Set(asset_id),
            ..sea_orm::ActiveModelTrait::default()
        };
        if let Some(is_favorite) = is_favorite {
            active.is_favorite = Set(is_favorite);
        }
        if let Some(visibility) = visibility.clone() {
            active.visibility = Set(visibility);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        active.update_id = Set(new_id());
        asset::Entity::update(active).exec(db).await?;
        affected += 1;
    }
    Ok(affected)
}

/// SQL-side relative time shift (§4.4 "Update metadata — Bulk update"):
/// `dateTimeOriginal += minutes` computed by Postgres, `timeZone` stamped,
/// both fields added to `lockedProperties`. Row-at-a-time for the same
/// fresh-`update_id`-per-row reason as `bulk_set_favorite_and_visibility`.
/// Rows with no existing `AssetExif` are silently skipped — there is nothing
/// to shift.
pub async fn apply_relative_time_shift(
    db: &DatabaseConnection,
    asset_ids: &[Uuid],
    minutes: f64,
    time_zone: &str,
) -> AppResult<u64> {
    let mut affected = 0u64;
    for &asset_id in asset_ids {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            UPDATE asset_exif
            SET date_time_original = date_time_original + make_interval(mins => $1::double precision),
                time_zone = $2,
                locked_properties = (
                    SELECT to_jsonb(array_agg(DISTINCT elem))
                    FROM jsonb_array_elements_text(
                        locked_properties || '["dateTimeOriginal","timeZone"]'::jsonb
                    ) AS elem
                ),
                update_id = $3
            WHERE asset_id = $4 AND date_time_original IS NOT NULL
            "#,
            vec![minutes.into(), time_zone.to_string().into(), new_id().into(), asset_id.into()],
        );
        let result = db.execute(stmt).await?;
        affected += result.rows_affected();
    }
    Ok(affected)
}

/// `GET /api/assets/device/:deviceId` (§6.2): every non-deleted
/// `deviceAssetId` the owner has uploaded from this device. Unlike
/// `find_by_device_asset_ids` (which checks a candidate list against what
/// exists), this lists everything for the device so the client can
/// reconcile its local state against the full remembered set.
pub async fn device_asset_ids(
    db: &DatabaseConnection,
    owner_id: Uuid,
    device_id: &str,
) -> AppResult<Vec<String>> {
    let rows = asset::Entity::find()
        .filter(asset::Column::OwnerId.eq(owner_id))
        .filter(asset::Column::DeviceId.eq(device_id))
        .filter(asset::Column::Status.ne(asset::AssetStatus::Deleted))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|a| a.device_asset_id).collect())
}

/// `GET /api/assets/statistics` (§6.2): per-type counts over the caller's
/// own non-deleted assets.
pub async fn asset_statistics(db: &DatabaseConnection, owner_id: Uuid) -> AppResult<super::domain::AssetStatistics> {
    use sea_orm::FromQueryResult;

    #[derive(FromQueryResult)]
    struct Row {
        r#type: String,
        count: i64,
    }

    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "SELECT type::text AS type, COUNT(*) AS count FROM assets \
         WHERE owner_id = $1 AND deleted_at IS NULL GROUP BY type",
        vec![owner_id.into()],
    );
    let rows = Row::find_by_statement(stmt).all(db).await?;

    let mut stats = super::domain::AssetStatistics::default();
    for row in rows {
        match row.r#type.as_str() {
            "image" => stats.images += row.count,
            "video" => stats.videos += row.count,
            _ => {}
        }
        stats.total += row.count;
    }
    Ok(stats)
}

