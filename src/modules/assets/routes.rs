use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, FixedOffset};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::access::{AccessGuard, Permission};
use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{ThumbnailSize, UploadOutcome};
use super::service::{AssetsService, BulkCheckResult, MetadataPatch, ThumbnailResolution};

#[derive(Debug, Serialize)]
struct UploadResponse {
    id: Uuid,
    status: &'static str,
}

/// Collects one multipart request into its named text fields plus the raw
/// bytes of `assetData` / `sidecarData` (§4.4 step 2: "stream the request
/// body ... simultaneously compute SHA-1" — buffered here since actix's
/// `Multipart` has already framed it into fields by the time handlers run).
struct ParsedUpload {
    fields: HashMap<String, String>,
    asset_data: Vec<u8>,
    sidecar_data: Option<Vec<u8>>,
    original_file_name: String,
}

async fn parse_multipart(mut payload: Multipart) -> AppResult<ParsedUpload> {
    let mut fields = HashMap::new();
    let mut asset_data = Vec::new();
    let mut sidecar_data = None;
    let mut original_file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;
        let disposition = field.content_disposition().cloned();
        let name = disposition
            .as_ref()
            .and_then(|d| d.get_name())
            .unwrap_or_default()
            .to_string();
        let filename = disposition.as_ref().and_then(|d| d.get_filename()).map(str::to_string);

        let mut buf = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            buf.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "assetData" => {
                if let Some(f) = filename {
                    original_file_name = f;
                }
                asset_data = buf;
            }
            "sidecarData" => sidecar_data = Some(buf),
            _ => {
                fields.insert(name, String::from_utf8_lossy(&buf).to_string());
            }
        }
    }

    Ok(ParsedUpload {
        fields,
        asset_data,
        sidecar_data,
        original_file_name,
    })
}

fn parse_datetime(raw: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .map_err(|_| AppError::BadRequest(format!("invalid timestamp: {raw}")))
}

#[actix_web::post("/api/assets")]
pub async fn upload(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let owner_id = auth.user_id();
    let parsed = parse_multipart(payload).await?;

    if parsed.asset_data.is_empty() {
        return Err(AppError::BadRequest("assetData is required".into()));
    }

    let device_asset_id = parsed
        .fields
        .get("deviceAssetId")
        .cloned()
        .ok_or_else(|| AppError::BadRequest("deviceAssetId is required".into()))?;
    let device_id = parsed
        .fields
        .get("deviceId")
        .cloned()
        .ok_or_else(|| AppError::BadRequest("deviceId is required".into()))?;
    let file_created_at = parse_datetime(
        parsed
            .fields
            .get("fileCreatedAt")
            .ok_or_else(|| AppError::BadRequest("fileCreatedAt is required".into()))?,
    )?;
    let file_modified_at = parse_datetime(
        parsed
            .fields
            .get("fileModifiedAt")
            .ok_or_else(|| AppError::BadRequest("fileModifiedAt is required".into()))?,
    )?;
    let local_date_time = parsed
        .fields
        .get("localDateTime")
        .map(|s| parse_datetime(s))
        .transpose()?
        .unwrap_or(file_created_at);
    let is_favorite = parsed
        .fields
        .get("isFavorite")
        .map(|v| v == "true")
        .unwrap_or(false);
    let duration_in_seconds = parsed
        .fields
        .get("duration")
        .and_then(|v| v.parse::<f64>().ok());
    let declared_checksum = parsed
        .fields
        .get("checksum")
        .map(|c| decode_checksum_header(c))
        .transpose()?;

    let input = super::domain::NewAssetInput {
        device_asset_id,
        device_id,
        file_created_at,
        file_modified_at,
        local_date_time,
        is_favorite,
        duration_in_seconds,
        original_file_name: parsed.original_file_name.clone(),
    };

    let service = AssetsService::new(&ctx);
    let outcome = service
        .upload(
            owner_id,
            None,
            declared_checksum.as_deref(),
            parsed.asset_data,
            input,
            parsed.sidecar_data,
        )
        .await?;

    match outcome {
        UploadOutcome::Created(id) => Ok(HttpResponse::Created().json(ApiResponse::success(UploadResponse {
            id,
            status: "created",
        }))),
        UploadOutcome::Duplicate(id) => Ok(HttpResponse::Ok().json(ApiResponse::success(UploadResponse {
            id,
            status: "duplicate",
        }))),
    }
}

fn decode_checksum_header(raw: &str) -> AppResult<Vec<u8>> {
    if raw.len() == 40 && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        let mut out = Vec::with_capacity(20);
        let bytes = raw.as_bytes();
        for chunk in bytes.chunks(2) {
            let s = std::str::from_utf8(chunk).unwrap();
            out.push(u8::from_str_radix(s, 16).map_err(|_| AppError::BadRequest("bad checksum".into()))?);
        }
        Ok(out)
    } else {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
        URL_SAFE_NO_PAD
            .decode(raw)
            .or_else(|_| base64::engine::general_purpose::STANDARD.decode(raw))
            .map_err(|_| AppError::BadRequest("bad checksum".into()))
    }
}

#[actix_web::put("/api/assets/{id}/original")]
pub async fn replace(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let asset_id = path.into_inner();
    guard
        .require_access(&auth, Permission::AssetReplace, &[asset_id])
        .await?;

    let parsed = parse_multipart(payload).await?;
    if parsed.asset_data.is_empty() {
        return Err(AppError::BadRequest("assetData is required".into()));
    }

    let service = AssetsService::new(&ctx);
    service
        .replace(asset_id, parsed.asset_data, parsed.original_file_name)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "id": asset_id }))))
}

#[derive(Debug, Deserialize)]
pub struct ExistRequest {
    device_id: String,
    device_asset_ids: Vec<String>,
}

#[actix_web::post("/api/assets/exist")]
pub async fn exist(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<ExistRequest>,
) -> AppResult<HttpResponse> {
    let service = AssetsService::new(&ctx);
    let existing = service
        .existing_device_asset_ids(auth.user_id(), &body.device_id, &body.device_asset_ids)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "existingIds": existing }))))
}

#[derive(Debug, Deserialize)]
pub struct BulkUploadCheckRequest {
    assets: Vec<BulkUploadCheckItem>,
}

#[derive(Debug, Deserialize)]
pub struct BulkUploadCheckItem {
    id: String,
    checksum: String,
}

#[derive(Debug, Serialize)]
struct BulkUploadCheckEntry {
    id: String,
    action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    asset_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_trashed: Option<bool>,
}

#[actix_web::post("/api/assets/bulk-upload-check")]
pub async fn bulk_upload_check(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<BulkUploadCheckRequest>,
) -> AppResult<HttpResponse> {
    let checksums = body
        .assets
        .iter()
        .map(|a| decode_checksum_header(&a.checksum))
        .collect::<AppResult<Vec<_>>>()?;

    let service = AssetsService::new(&ctx);
    let results = service
        .bulk_upload_check(auth.user_id(), None, &checksums)
        .await?;

    let entries: Vec<BulkUploadCheckEntry> = body
        .assets
        .iter()
        .zip(results)
        .map(|(req, result)| match result {
            BulkCheckResult::Accept => BulkUploadCheckEntry {
                id: req.id.clone(),
                action: "accept",
                reason: None,
                asset_id: None,
                is_trashed: None,
            },
            BulkCheckResult::Reject { asset_id, is_trashed } => BulkUploadCheckEntry {
                id: req.id.clone(),
                action: "reject",
                reason: Some("duplicate"),
                asset_id: Some(asset_id),
                is_trashed: Some(is_trashed),
            },
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "results": entries }))))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMetadataRequest {
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    date_time_original: Option<String>,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    rating: Option<i32>,
}

fn parse_visibility(raw: &str) -> AppResult<crate::entity::asset::AssetVisibility> {
    use crate::entity::asset::AssetVisibility;
    match raw {
        "timeline" => Ok(AssetVisibility::Timeline),
        "archive" => Ok(AssetVisibility::Archive),
        "hidden" => Ok(AssetVisibility::Hidden),
        "locked" => Ok(AssetVisibility::Locked),
        other => Err(AppError::BadRequest(format!("unknown visibility: {other}"))),
    }
}

#[actix_web::put("/api/assets/{id}")]
pub async fn update_metadata(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateMetadataRequest>,
) -> AppResult<HttpResponse> {
    let asset_id = path.into_inner();
    guard
        .require_access(&auth, Permission::AssetUpdate, &[asset_id])
        .await?;

    let visibility = body.visibility.as_deref().map(parse_visibility).transpose()?;

    let service = AssetsService::new(&ctx);
    service
        .update_metadata(
            asset_id,
            MetadataPatch {
                is_favorite: body.is_favorite,
                visibility,
                date_time_original: body.date_time_original.clone(),
                time_zone: body.time_zone.clone(),
                latitude: body.latitude,
                longitude: body.longitude,
                description: body.description.clone(),
                rating: body.rating,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "id": asset_id }))))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssetResponse {
    id: Uuid,
    owner_id: Uuid,
    original_file_name: String,
    device_asset_id: String,
    device_id: String,
    r#type: &'static str,
    visibility: &'static str,
    is_favorite: bool,
    file_created_at: DateTime<FixedOffset>,
    file_modified_at: DateTime<FixedOffset>,
    local_date_time: DateTime<FixedOffset>,
    file_size_in_byte: i64,
    duration_in_seconds: Option<f64>,
    width: Option<i32>,
    height: Option<i32>,
}

fn asset_type_str(t: &crate::entity::asset::AssetType) -> &'static str {
    use crate::entity::asset::AssetType;
    match t {
        AssetType::Image => "image",
        AssetType::Video => "video",
        AssetType::Audio => "audio",
        AssetType::Other => "other",
    }
}

fn asset_visibility_str(v: &crate::entity::asset::AssetVisibility) -> &'static str {
    use crate::entity::asset::AssetVisibility;
    match v {
        AssetVisibility::Timeline => "timeline",
        AssetVisibility::Archive => "archive",
        AssetVisibility::Hidden => "hidden",
        AssetVisibility::Locked => "locked",
    }
}

impl From<crate::entity::asset::Model> for AssetResponse {
    fn from(a: crate::entity::asset::Model) -> Self {
        Self {
            id: a.id,
            owner_id: a.owner_id,
            original_file_name: a.original_file_name,
            device_asset_id: a.device_asset_id,
            device_id: a.device_id,
            r#type: asset_type_str(&a.r#type),
            visibility: asset_visibility_str(&a.visibility),
            is_favorite: a.is_favorite,
            file_created_at: a.file_created_at,
            file_modified_at: a.file_modified_at,
            local_date_time: a.local_date_time,
            file_size_in_byte: a.file_size_in_byte,
            duration_in_seconds: a.duration_in_seconds,
            width: a.width,
            height: a.height,
        }
    }
}

/// `GET /api/assets/{id}` (§6.2, §8 Upload→Get round-trip).
#[actix_web::get("/api/assets/{id}")]
pub async fn get_asset(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let asset_id = path.into_inner();
    guard
        .require_access(&auth, Permission::AssetRead, &[asset_id])
        .await?;

    let service = AssetsService::new(&ctx);
    let found = service.get_asset(asset_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(AssetResponse::from(found))))
}

/// `GET /api/assets/statistics` (§6.2).
#[actix_web::get("/api/assets/statistics")]
pub async fn statistics(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let service = AssetsService::new(&ctx);
    let stats = service.statistics(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}

/// `GET /api/assets/device/:deviceId` (§6.2): full reconciliation list, not
/// the candidate-checking `POST /exist`.
#[actix_web::get("/api/assets/device/{device_id}")]
pub async fn device_asset_ids(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let device_id = path.into_inner();
    let service = AssetsService::new(&ctx);
    let ids = service.device_asset_ids(auth.user_id(), &device_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(ids)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateMetadataRequest {
    ids: Vec<Uuid>,
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    date_time_relative: Option<f64>,
    #[serde(default)]
    time_zone: Option<String>,
}

/// `PUT /api/assets/metadata` (§4.4 "Update metadata — Bulk update").
#[actix_web::put("/api/assets/metadata")]
pub async fn bulk_update_metadata(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    body: web::Json<BulkUpdateMetadataRequest>,
) -> AppResult<HttpResponse> {
    guard
        .require_access(&auth, Permission::AssetUpdate, &body.ids)
        .await?;

    let visibility = body.visibility.as_deref().map(parse_visibility).transpose()?;
    let relative_shift = match (body.date_time_relative, body.time_zone.clone()) {
        (Some(minutes), Some(time_zone)) => Some(super::domain::RelativeTimeShift { minutes, time_zone }),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "dateTimeRelative and timeZone must be supplied together".into(),
            ))
        }
    };

    let service = AssetsService::new(&ctx);
    let affected = service
        .bulk_update_metadata(&body.ids, body.is_favorite, visibility, relative_shift)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "affected": affected }))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteMetadataRequest {
    ids: Vec<Uuid>,
    key: String,
}

/// `DELETE /api/assets/metadata` — bulk form of the per-asset metadata
/// delete.
#[actix_web::delete("/api/assets/metadata")]
pub async fn bulk_delete_metadata_entry(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    body: web::Json<BulkDeleteMetadataRequest>,
) -> AppResult<HttpResponse> {
    guard
        .require_access(&auth, Permission::AssetUpdate, &body.ids)
        .await?;

    let service = AssetsService::new(&ctx);
    let affected = service.bulk_delete_metadata_entry(&body.ids, &body.key).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "affected": affected }))))
}

#[derive(Debug, Deserialize)]
pub struct MetadataEntryRequest {
    value: serde_json::Value,
}

#[actix_web::put("/api/assets/{id}/metadata/{key}")]
pub async fn put_metadata_entry(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    path: web::Path<(Uuid, String)>,
    body: web::Json<MetadataEntryRequest>,
) -> AppResult<HttpResponse> {
    let (asset_id, key) = path.into_inner();
    guard
        .require_access(&auth, Permission::AssetUpdate, &[asset_id])
        .await?;

    let service = AssetsService::new(&ctx);
    service.put_metadata_entry(asset_id, key, body.into_inner().value).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[actix_web::delete("/api/assets/{id}/metadata/{key}")]
pub async fn delete_metadata_entry(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    path: web::Path<(Uuid, String)>,
) -> AppResult<HttpResponse> {
    let (asset_id, key) = path.into_inner();
    guard
        .require_access(&auth, Permission::AssetUpdate, &[asset_id])
        .await?;

    let service = AssetsService::new(&ctx);
    service.delete_metadata_entry(asset_id, &key).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default)]
    edited: bool,
}

#[actix_web::get("/api/assets/{id}/original")]
pub async fn download_original(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    path: web::Path<Uuid>,
    query: web::Query<DownloadQuery>,
) -> AppResult<HttpResponse> {
    let asset_id = path.into_inner();
    guard.require_access(&auth, Permission::AssetRead, &[asset_id]).await?;

    let service = AssetsService::new(&ctx);
    let edited = query.edited || auth.principal.is_shared_link();
    let (key, found) = service.original_download_key(asset_id, edited).await?;
    let bytes = service.read_bytes(&key, None).await?;

    let ext = super::domain::extension_of(&key);
    let content_type = mime_for_extension(&ext);
    let filename = format!(
        "{}.{ext}",
        found.original_file_name.rsplit_once('.').map(|(b, _)| b).unwrap_or(&found.original_file_name)
    );

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{filename}\"")))
        .insert_header(("Cache-Control", "private, immutable"))
        .body(bytes))
}

#[derive(Debug, Deserialize)]
pub struct ThumbnailQuery {
    size: String,
    #[serde(default)]
    edited: bool,
}

#[actix_web::get("/api/assets/{id}/thumbnail")]
pub async fn thumbnail(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<ThumbnailQuery>,
) -> AppResult<HttpResponse> {
    let asset_id = path.into_inner();
    guard.require_access(&auth, Permission::AssetRead, &[asset_id]).await?;

    let size = ThumbnailSize::parse(&query.size)
        .ok_or_else(|| AppError::BadRequest(format!("unsupported size: {}", query.size)))?;

    let service = AssetsService::new(&ctx);
    match service.resolve_thumbnail(asset_id, size).await? {
        ThumbnailResolution::Serve(key) => {
            let bytes = service.read_bytes(&key, None).await?;
            Ok(HttpResponse::Ok()
                .content_type("image/webp")
                .insert_header(("Cache-Control", "private, immutable"))
                .body(bytes))
        }
        ThumbnailResolution::RedirectToOriginal => {
            let location = redirect_location(&req, &format!("/api/assets/{asset_id}/original"), query.edited);
            Ok(HttpResponse::Found().insert_header(("Location", location)).finish())
        }
        ThumbnailResolution::RedirectToSize(new_size) => {
            let location = redirect_location(
                &req,
                &format!("/api/assets/{asset_id}/thumbnail?size={}", size_str(new_size)),
                query.edited,
            );
            Ok(HttpResponse::Found().insert_header(("Location", location)).finish())
        }
    }
}

fn size_str(size: ThumbnailSize) -> &'static str {
    match size {
        ThumbnailSize::Thumbnail => "thumbnail",
        ThumbnailSize::Preview => "preview",
        ThumbnailSize::Fullsize => "fullsize",
    }
}

fn redirect_location(req: &HttpRequest, base_path: &str, edited: bool) -> String {
    let scheme = req.connection_info().scheme().to_string();
    let host = req.connection_info().host().to_string();
    let mut url = format!("{scheme}://{host}{base_path}");
    if edited {
        url.push_str(if url.contains('?') { "&edited=true" } else { "?edited=true" });
    }
    url
}

#[actix_web::get("/api/assets/{id}/video/playback")]
pub async fn video_playback(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let asset_id = path.into_inner();
    guard.require_access(&auth, Permission::AssetRead, &[asset_id]).await?;

    let service = AssetsService::new(&ctx);
    let key = service.video_playback_key(asset_id).await?;
    let total = service.blob_size(&key).await?;

    if let Some(range_header) = req.headers().get("Range").and_then(|v| v.to_str().ok()) {
        if let Some((start, end)) = parse_range(range_header, total) {
            let length = end - start + 1;
            let bytes = service
                .read_bytes(&key, Some(crate::blob_store::ByteRange { offset: start, length }))
                .await?;
            return Ok(HttpResponse::PartialContent()
                .insert_header(("Content-Range", format!("bytes {start}-{end}/{total}")))
                .insert_header(("Accept-Ranges", "bytes"))
                .insert_header(("Content-Length", bytes.len().to_string()))
                .content_type("video/mp4")
                .body(bytes));
        }
    }

    let bytes = service.read_bytes(&key, None).await?;
    Ok(HttpResponse::Ok()
        .insert_header(("Accept-Ranges", "bytes"))
        .content_type("video/mp4")
        .body(bytes))
}

/// Parses a single-range `Range: bytes=a-b` header (§4.5, §8 property 7).
/// Multi-range requests are not supported; they fall through to a full 200.
fn parse_range(header: &str, total: u64) -> Option<(u64, u64)> {
    let spec = header.strip_prefix("bytes=")?;
    if spec.contains(',') {
        return None;
    }
    let (start_s, end_s) = spec.split_once('-')?;
    let start: u64 = start_s.parse().ok()?;
    let end = if end_s.is_empty() {
        total.saturating_sub(1)
    } else {
        end_s.parse().ok()?
    };
    if start > end || end >= total {
        return None;
    }
    Some((start, end))
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(upload)
        .service(replace)
        .service(exist)
        .service(bulk_upload_check)
        .service(statistics)
        .service(device_asset_ids)
        .service(bulk_update_metadata)
        .service(bulk_delete_metadata_entry)
        .service(update_metadata)
        .service(put_metadata_entry)
        .service(delete_metadata_entry)
        .service(download_original)
        .service(thumbnail)
        .service(video_playback)
        .service(get_asset);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_range_rejects_out_of_bounds() {
        assert!(parse_range("bytes=0-99", 50).is_none());
        assert_eq!(parse_range("bytes=0-49", 50), Some((0, 49)));
        assert_eq!(parse_range("bytes=10-", 50), Some((10, 49)));
    }

    #[test]
    fn parse_range_rejects_multi_range() {
        assert!(parse_range("bytes=0-9,20-29", 50).is_none());
    }

    #[test]
    fn decode_checksum_header_accepts_40_char_hex() {
        let hex = "a".repeat(40);
        assert_eq!(decode_checksum_header(&hex).unwrap().len(), 20);
    }
}
