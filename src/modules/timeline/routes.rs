use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::entity::asset::AssetVisibility;
use crate::modules::access::{AccessGuard, Permission};
use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{default_visibility_filter, BucketOrder, TimeBucketFilters, TimelineScope};
use super::service::TimelineService;

fn parse_visibility(raw: &str) -> AppResult<AssetVisibility> {
    match raw {
        "timeline" => Ok(AssetVisibility::Timeline),
        "archive" => Ok(AssetVisibility::Archive),
        "locked" => Ok(AssetVisibility::Locked),
        other => Err(AppError::BadRequest(format!("unsupported timeline visibility: {other}"))),
    }
}

/// Resolves the common scope/filter query params, checking `AlbumRead`
/// access when the scope is a specific album rather than the caller's own
/// timeline. actix's query-string extractor doesn't support `#[serde(flatten)]`
/// reliably, so each query struct repeats these fields rather than nesting one.
async fn resolve_filters(
    guard: &AccessGuard,
    auth: &AuthContext,
    album_id: Option<Uuid>,
    tag_id: Option<Uuid>,
    is_favorite: Option<bool>,
    visibility: &Option<Vec<String>>,
) -> AppResult<TimeBucketFilters> {
    let scope = match album_id {
        Some(album_id) => {
            guard.require_access(auth, Permission::AlbumRead, &[album_id]).await?;
            TimelineScope::Album(album_id)
        }
        None => TimelineScope::Owner(auth.user_id()),
    };

    let visibility = visibility
        .as_ref()
        .map(|vs| vs.iter().map(|v| parse_visibility(v)).collect::<AppResult<Vec<_>>>())
        .transpose()?
        .unwrap_or_else(default_visibility_filter);

    Ok(TimeBucketFilters {
        scope,
        tag_id,
        is_favorite,
        visibility,
    })
}

#[derive(Debug, Deserialize)]
pub struct TimeBucketsQuery {
    #[serde(default)]
    album_id: Option<Uuid>,
    #[serde(default)]
    tag_id: Option<Uuid>,
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    visibility: Option<Vec<String>>,
    #[serde(default)]
    order: Option<String>,
}

/// `GET /api/timeline/buckets` — month-bucket counts (§4.7).
#[actix_web::get("/api/timeline/buckets")]
pub async fn buckets(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    query: web::Query<TimeBucketsQuery>,
) -> AppResult<HttpResponse> {
    let filters = resolve_filters(
        &guard,
        &auth,
        query.album_id,
        query.tag_id,
        query.is_favorite,
        &query.visibility,
    )
    .await?;
    let order = match query.order.as_deref() {
        Some("asc") => BucketOrder::Asc,
        _ => BucketOrder::Desc,
    };

    let service = TimelineService::new(&ctx);
    let rows = service.time_buckets(&filters, order).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(rows)))
}

#[derive(Debug, Deserialize)]
pub struct TimeBucketQuery {
    #[serde(default)]
    album_id: Option<Uuid>,
    #[serde(default)]
    tag_id: Option<Uuid>,
    #[serde(default)]
    is_favorite: Option<bool>,
    #[serde(default)]
    visibility: Option<Vec<String>>,
    time_bucket: String,
}

/// `GET /api/timeline/bucket` — columnar asset list for one month (§4.7).
#[actix_web::get("/api/timeline/bucket")]
pub async fn bucket(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    query: web::Query<TimeBucketQuery>,
) -> AppResult<HttpResponse> {
    let filters = resolve_filters(
        &guard,
        &auth,
        query.album_id,
        query.tag_id,
        query.is_favorite,
        &query.visibility,
    )
    .await?;
    let service = TimelineService::new(&ctx);
    let assets = service.time_bucket(&filters, &query.time_bucket).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(assets)))
}

/// `GET /api/view/folders` — distinct directory prefixes of the caller's
/// own assets.
#[actix_web::get("/api/view/folders")]
pub async fn folders(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let service = TimelineService::new(&ctx);
    let paths = service.unique_original_paths(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(paths)))
}

#[derive(Debug, Deserialize)]
pub struct FolderQuery {
    path: String,
}

/// `GET /api/view/folder` — assets directly under `path`, no deeper
/// subdirectory (§4.7).
#[actix_web::get("/api/view/folder")]
pub async fn folder(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    query: web::Query<FolderQuery>,
) -> AppResult<HttpResponse> {
    let service = TimelineService::new(&ctx);
    let assets = service.assets_by_original_path(auth.user_id(), &query.path).await?;
    let payload: Vec<_> = assets.iter().map(crate::modules::sync::repo::asset_v1_payload).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(payload)))
}

#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    #[serde(default = "default_random_count")]
    count: u64,
}

fn default_random_count() -> u64 {
    100
}

/// `GET /api/timeline/random` — `getRandom(count)` (§4.7).
#[actix_web::get("/api/timeline/random")]
pub async fn random(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    query: web::Query<RandomQuery>,
) -> AppResult<HttpResponse> {
    let service = TimelineService::new(&ctx);
    let assets = service.random(auth.user_id(), query.count).await?;
    let payload: Vec<_> = assets.iter().map(crate::modules::sync::repo::asset_v1_payload).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(payload)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(buckets)
        .service(bucket)
        .service(folders)
        .service(folder)
        .service(random);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_visibility_rejects_hidden() {
        assert!(parse_visibility("hidden").is_err());
        assert!(parse_visibility("timeline").is_ok());
    }
}
