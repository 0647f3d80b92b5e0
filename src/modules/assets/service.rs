//! Ingest (§4.4) and Retrieve (§4.5) — the second of the three subsystems
//! spec.md calls "the core".

use sea_orm::{EntityTrait, TransactionTrait};
use uuid::Uuid;

use crate::blob_store::{key as blob_key, ByteRange};
use crate::entity::{asset, asset_file};
use crate::shared::context::ServiceContext;
use crate::shared::crypto::sha1;
use crate::shared::error::{AppError, AppResult};
use crate::shared::ids::new_id;

use super::domain::{self, NewAssetInput, ThumbnailSize, UploadOutcome};
use super::repo;

pub struct AssetsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AssetsService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// §4.4 steps 1-11. `declared_checksum` is the pre-read header (step 1),
    /// when the caller sent one; `bytes` is the full request body.
    pub async fn upload(
        &self,
        owner_id: Uuid,
        library_id: Option<Uuid>,
        declared_checksum: Option<&[u8]>,
        bytes: Vec<u8>,
        input: NewAssetInput,
        sidecar: Option<Vec<u8>>,
    ) -> AppResult<UploadOutcome> {
        if let Some(checksum) = declared_checksum {
            if let Some(existing) =
                repo::find_by_checksum(&self.ctx.db, owner_id, library_id, checksum).await?
            {
                return Ok(UploadOutcome::Duplicate(existing.id));
            }
        }

        let checksum = sha1(&bytes).to_vec();
        let size = bytes.len() as i64;

        let user = repo::find_user(&self.ctx.db, owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user".into()))?;
        if let Some(quota) = user.quota_size_in_bytes {
            let remaining = quota - user.quota_usage_in_bytes - size;
            if remaining < 0 {
                return Err(AppError::QuotaExceeded);
            }
        }

        if let Some(existing) =
            repo::find_by_checksum(&self.ctx.db, owner_id, library_id, &checksum).await?
        {
            return Ok(UploadOutcome::Duplicate(existing.id));
        }

        let asset_id = new_id();
        let ext = domain::extension_of(&input.original_file_name);
        let original_path = blob_key::original(&owner_id.to_string(), &asset_id.to_string(), &ext);
        let asset_type = domain::infer_asset_type(&input.original_file_name);

        self.ctx
            .blob_store
            .put(&original_path, bytes.clone())
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        let txn = self.ctx.db.begin().await.map_err(AppError::from)?;
        let inserted = match repo::insert_asset(
            &txn,
            asset_id,
            owner_id,
            library_id,
            checksum.clone(),
            original_path.clone(),
            &input,
            asset_type.clone(),
            size,
        )
        .await
        {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                // §4.4 "Duplicate resolution under race": the unique
                // constraint lost; the orphaned blob is reaped later (§7/§9).
                txn.rollback().await.ok();
                let winner = repo::find_by_checksum(&self.ctx.db, owner_id, library_id, &checksum)
                    .await?
                    .ok_or_else(|| AppError::Internal(anyhow::anyhow!(
                        "unique-constraint race but no winning row found"
                    )))?;
                return Ok(UploadOutcome::Duplicate(winner.id));
            }
            Err(err) => {
                txn.rollback().await.ok();
                return Err(err);
            }
        };
        repo::increment_quota_usage(&txn, owner_id, size).await?;
        txn.commit().await.map_err(AppError::from)?;

        // Best-effort EXIF + variants; failures never fail the upload (§4.4 step 7, §7).
        let mut exif_record = self.ctx.exif.extract(&bytes);
        exif_record.file_size_in_byte = size;
        let (mut width, mut height) = (None, None);

        if asset_type == asset::AssetType::Image {
            match self.ctx.variants.generate(&bytes).await {
                Ok(generated) => {
                    width = Some(generated.dimensions.width as i32);
                    height = Some(generated.dimensions.height as i32);
                    let thumb_key = blob_key::thumbnail(&owner_id.to_string(), &asset_id.to_string());
                    let preview_key = blob_key::preview(&owner_id.to_string(), &asset_id.to_string());
                    if self.ctx.blob_store.put(&thumb_key, generated.thumbnail_webp).await.is_ok() {
                        repo::insert_asset_file(
                            &self.ctx.db,
                            asset_id,
                            asset_file::AssetFileType::Thumbnail,
                            thumb_key,
                            false,
                        )
                        .await
                        .ok();
                    }
                    if self.ctx.blob_store.put(&preview_key, generated.preview_webp).await.is_ok() {
                        repo::insert_asset_file(
                            &self.ctx.db,
                            asset_id,
                            asset_file::AssetFileType::Preview,
                            preview_key,
                            false,
                        )
                        .await
                        .ok();
                    }
                }
                Err(err) => {
                    tracing::warn!(%asset_id, error = %err, "variant generation failed, continuing best-effort");
                }
            }
        }

        repo::upsert_exif_from_extraction(&self.ctx.db, asset_id, width, height, &exif_record)
            .await
            .ok();

        if let Some(sidecar_bytes) = sidecar {
            let sidecar_key = blob_key::sidecar(&owner_id.to_string(), &asset_id.to_string());
            if self.ctx.blob_store.put(&sidecar_key, sidecar_bytes).await.is_ok() {
                repo::insert_asset_file(
                    &self.ctx.db,
                    asset_id,
                    asset_file::AssetFileType::Sidecar,
                    sidecar_key,
                    false,
                )
                .await
                .ok();
            }
        }

        Ok(UploadOutcome::Created(inserted.id))
    }

    /// `PUT /assets/:id/original` (§4.4 "Replace").
    pub async fn replace(
        &self,
        asset_id: Uuid,
        bytes: Vec<u8>,
        original_file_name: String,
    ) -> AppResult<()> {
        let existing = repo::find_by_id(&self.ctx.db, asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound("asset".into()))?;

        let checksum = sha1(&bytes).to_vec();
        let size = bytes.len() as i64;
        let ext = domain::extension_of(&original_file_name);
        let original_path =
            blob_key::original(&existing.owner_id.to_string(), &asset_id.to_string(), &ext);
        let asset_type = domain::infer_asset_type(&original_file_name);

        self.ctx
            .blob_store
            .put(&original_path, bytes)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        repo::set_original(
            &self.ctx.db,
            asset_id,
            original_path,
            checksum,
            original_file_name,
            asset_type,
            size,
        )
        .await?;

        // Quota asymmetry is accepted by design (§4.4, §9 open question 1):
        // the replaced byte count is not reclaimed until trash-purge runs.
        repo::increment_quota_usage(&self.ctx.db, existing.owner_id, size).await?;

        Ok(())
    }

    /// `POST /assets/exist` (§4.4 "Bulk existence", part one).
    pub async fn existing_device_asset_ids(
        &self,
        owner_id: Uuid,
        device_id: &str,
        device_asset_ids: &[String],
    ) -> AppResult<Vec<String>> {
        repo::find_by_device_asset_ids(&self.ctx.db, owner_id, device_id, device_asset_ids).await
    }

    /// `POST /assets/bulk-upload-check` (§4.4 "Bulk existence", part two).
    pub async fn bulk_upload_check(
        &self,
        owner_id: Uuid,
        library_id: Option<Uuid>,
        checksums: &[Vec<u8>],
    ) -> AppResult<Vec<BulkCheckResult>> {
        let mut out = Vec::with_capacity(checksums.len());
        for checksum in checksums {
            match repo::find_by_checksum(&self.ctx.db, owner_id, library_id, checksum).await? {
                Some(existing) => out.push(BulkCheckResult::Reject {
                    asset_id: existing.id,
                    is_trashed: existing.status == asset::AssetStatus::Trashed,
                }),
                None => out.push(BulkCheckResult::Accept),
            }
        }
        Ok(out)
    }

    /// Single-asset metadata update (§4.4 "Update metadata").
    pub async fn update_metadata(
        &self,
        asset_id: Uuid,
        patch: MetadataPatch,
    ) -> AppResult<()> {
        let mut active = asset::ActiveModel {
            id: sea_orm::ActiveValue::Set(asset_id),
            ..sea_orm::ActiveModelTrait::default()
        };
        if let Some(is_favorite) = patch.is_favorite {
            active.is_favorite = sea_orm::ActiveValue::Set(is_favorite);
        }
        if let Some(visibility) = patch.visibility.clone() {
            active.visibility = sea_orm::ActiveValue::Set(visibility);
        }
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().into());
        active.update_id = sea_orm::ActiveValue::Set(new_id());
        asset::Entity::update(active)
            .exec(&self.ctx.db)
            .await
            .map_err(AppError::from)?;

        let mut exif_patch = Vec::new();
        if let Some(dt) = &patch.date_time_original {
            exif_patch.push(("dateTimeOriginal", serde_json::json!(dt)));
        }
        if let Some(tz) = &patch.time_zone {
            exif_patch.push(("timeZone", serde_json::json!(tz)));
        }
        if let Some(lat) = patch.latitude {
            exif_patch.push(("latitude", serde_json::json!(lat)));
        }
        if let Some(lon) = patch.longitude {
            exif_patch.push(("longitude", serde_json::json!(lon)));
        }
        if let Some(desc) = &patch.description {
            exif_patch.push(("description", serde_json::json!(desc)));
        }
        if let Some(rating) = patch.rating {
            exif_patch.push(("rating", serde_json::json!(rating)));
        }
        repo::apply_exif_patch(&self.ctx.db, asset_id, &exif_patch).await?;
        Ok(())
    }

    /// `PUT /assets/{id}/metadata/{key}` — arbitrary caller-defined
    /// `AssetMetadata` entries, distinct from the fixed EXIF/favorite/
    /// visibility fields `update_metadata` writes.
    pub async fn put_metadata_entry(&self, asset_id: Uuid, key: String, value: serde_json::Value) -> AppResult<()> {
        repo::upsert_metadata_entry(&self.ctx.db, asset_id, key, value).await
    }

    pub async fn delete_metadata_entry(&self, asset_id: Uuid, key: &str) -> AppResult<()> {
        repo::delete_metadata_entry(&self.ctx.db, asset_id, key).await
    }

    /// `PUT /api/assets/metadata` — the bulk form of `update_metadata`
    /// (§4.4 "Update metadata — Bulk update"): applies `isFavorite`/
    /// `visibility` across every listed asset and, when a relative time
    /// shift is supplied, shifts `dateTimeOriginal` SQL-side and locks both
    /// `dateTimeOriginal` and `timeZone` on every affected exif row.
    pub async fn bulk_update_metadata(
        &self,
        asset_ids: &[Uuid],
        is_favorite: Option<bool>,
        visibility: Option<asset::AssetVisibility>,
        relative_shift: Option<domain::RelativeTimeShift>,
    ) -> AppResult<u64> {
        let mut affected = 0u64;
        if is_favorite.is_some() || visibility.is_some() {
            affected = repo::bulk_set_favorite_and_visibility(&self.ctx.db, asset_ids, is_favorite, visibility)
                .await?;
        }
        if let Some(shift) = relative_shift {
            let shifted =
                repo::apply_relative_time_shift(&self.ctx.db, asset_ids, shift.minutes, &shift.time_zone).await?;
            affected = affected.max(shifted);
        }
        Ok(affected)
    }

    /// `DELETE /api/assets/metadata` — bulk form of `delete_metadata_entry`:
    /// removes one `AssetMetadata` key across every listed asset.
    pub async fn bulk_delete_metadata_entry(&self, asset_ids: &[Uuid], key: &str) -> AppResult<u64> {
        repo::delete_metadata_entry_bulk(&self.ctx.db, asset_ids, key).await
    }

    /// `GET /api/assets/{id}` (§6.2, §8 Upload→Get round-trip).
    pub async fn get_asset(&self, asset_id: Uuid) -> AppResult<asset::Model> {
        repo::find_by_id(&self.ctx.db, asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound("asset".into()))
    }

    /// `GET /api/assets/device/:deviceId` (§6.2).
    pub async fn device_asset_ids(&self, owner_id: Uuid, device_id: &str) -> AppResult<Vec<String>> {
        repo::device_asset_ids(&self.ctx.db, owner_id, device_id).await
    }

    /// `GET /api/assets/statistics` (§6.2).
    pub async fn statistics(&self, owner_id: Uuid) -> AppResult<domain::AssetStatistics> {
        repo::asset_statistics(&self.ctx.db, owner_id).await
    }

    /// Resolves which BlobStore key to read for a download (§4.5 "Download original").
    pub async fn original_download_key(&self, asset_id: Uuid, edited: bool) -> AppResult<(String, asset::Model)> {
        let found = repo::find_by_id(&self.ctx.db, asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound("asset".into()))?;

        if edited {
            if let Some(fullsize) =
                repo::find_asset_file(&self.ctx.db, asset_id, asset_file::AssetFileType::Fullsize, true).await?
            {
                return Ok((fullsize.path, found));
            }
        }
        Ok((found.original_path.clone(), found))
    }

    /// §4.5 "Thumbnail" fallback chain. Returns either a blob key to serve
    /// directly or a redirect target (a rewritten `size` value).
    pub async fn resolve_thumbnail(
        &self,
        asset_id: Uuid,
        size: ThumbnailSize,
    ) -> AppResult<ThumbnailResolution> {
        let found = repo::find_by_id(&self.ctx.db, asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound("asset".into()))?;

        match size {
            ThumbnailSize::Thumbnail => {
                match repo::find_asset_file(&self.ctx.db, asset_id, asset_file::AssetFileType::Thumbnail, false).await? {
                    Some(f) => Ok(ThumbnailResolution::Serve(f.path)),
                    None => Err(AppError::StorageMissing("thumbnail".into())),
                }
            }
            ThumbnailSize::Preview => {
                match repo::find_asset_file(&self.ctx.db, asset_id, asset_file::AssetFileType::Preview, false).await? {
                    Some(f) => Ok(ThumbnailResolution::Serve(f.path)),
                    None => Err(AppError::StorageMissing("preview".into())),
                }
            }
            ThumbnailSize::Fullsize => {
                if let Some(f) =
                    repo::find_asset_file(&self.ctx.db, asset_id, asset_file::AssetFileType::Fullsize, false).await?
                {
                    return Ok(ThumbnailResolution::Serve(f.path));
                }
                let ext = domain::extension_of(&found.original_path);
                if domain::is_web_supported_image(&ext) {
                    Ok(ThumbnailResolution::RedirectToOriginal)
                } else {
                    Ok(ThumbnailResolution::RedirectToSize(ThumbnailSize::Preview))
                }
            }
        }
    }

    /// §4.5 "Video playback".
    pub async fn video_playback_key(&self, asset_id: Uuid) -> AppResult<String> {
        let found = repo::find_by_id(&self.ctx.db, asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound("asset".into()))?;
        if let Some(f) =
            repo::find_asset_file(&self.ctx.db, asset_id, asset_file::AssetFileType::Fullsize, true).await?
        {
            return Ok(f.path);
        }
        Ok(found.original_path)
    }

    pub async fn read_bytes(&self, key: &str, range: Option<ByteRange>) -> AppResult<Vec<u8>> {
        self.ctx
            .blob_store
            .get(key, range)
            .await
            .map_err(|e| match e {
                crate::blob_store::BlobStoreError::NotFound => AppError::StorageMissing(key.to_string()),
                other => AppError::Internal(other.into()),
            })
    }

    pub async fn blob_size(&self, key: &str) -> AppResult<u64> {
        self.ctx
            .blob_store
            .size(key)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }
}

pub enum BulkCheckResult {
    Accept,
    Reject { asset_id: Uuid, is_trashed: bool },
}

pub enum ThumbnailResolution {
    Serve(String),
    RedirectToOriginal,
    RedirectToSize(ThumbnailSize),
}

/// Best-effort detection of a unique-constraint failure on
/// `idx_assets_owner_library_checksum`, so genuine DB errors still propagate
/// instead of being silently swallowed as a duplicate race.
fn is_unique_violation(err: &AppError) -> bool {
    matches!(err, AppError::Internal(e) if e.to_string().to_lowercase().contains("duplicate")
        || e.to_string().to_lowercase().contains("unique constraint"))
}

#[derive(Debug, Default, Clone)]
pub struct MetadataPatch {
    pub is_favorite: Option<bool>,
    pub visibility: Option<asset::AssetVisibility>,
    pub date_time_original: Option<String>,
    pub time_zone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub rating: Option<i32>,
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::entity::asset::{AssetStatus, AssetType, AssetVisibility};
    use crate::test_helpers::TestContextBuilder;

    use super::*;

    fn sample_asset(owner_id: Uuid, status: AssetStatus) -> asset::Model {
        let now = chrono::Utc::now().into();
        asset::Model {
            id: Uuid::new_v4(),
            owner_id,
            library_id: None,
            checksum: vec![9, 9, 9],
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

    #[test]
    fn is_unique_violation_matches_duplicate_constraint_errors() {
        let err = AppError::Internal(anyhow::anyhow!("duplicate key value violates unique constraint"));
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn is_unique_violation_ignores_unrelated_errors() {
        let err = AppError::Internal(anyhow::anyhow!("connection reset by peer"));
        assert!(!is_unique_violation(&err));
    }

    #[tokio::test]
    async fn bulk_upload_check_reports_existing_and_accepts_new() {
        let owner = Uuid::new_v4();
        let existing = sample_asset(owner, AssetStatus::Trashed);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing.clone()]])
            .append_query_results([Vec::<asset::Model>::new()])
            .into_connection();

        let ctx = TestContextBuilder::new().with_db(db).build();
        let service = AssetsService::new(&ctx);

        let results = service
            .bulk_upload_check(owner, None, &[existing.checksum.clone(), vec![1, 2, 3]])
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        match &results[0] {
            BulkCheckResult::Reject { asset_id, is_trashed } => {
                assert_eq!(*asset_id, existing.id);
                assert!(*is_trashed);
            }
            BulkCheckResult::Accept => panic!("expected a Reject for the known checksum"),
        }
        assert!(matches!(results[1], BulkCheckResult::Accept));
    }
}
