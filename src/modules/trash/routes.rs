use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::access::{AccessGuard, Permission};
use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::AppResult;

use super::service::TrashService;

#[derive(Debug, Deserialize)]
pub struct DeleteAssetsRequest {
    ids: Vec<Uuid>,
}

/// `DELETE /api/assets` (§8 property 5) — soft-delete into the trash.
#[actix_web::delete("/api/assets")]
pub async fn delete_assets(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    guard: web::Data<AccessGuard>,
    body: web::Json<DeleteAssetsRequest>,
) -> AppResult<HttpResponse> {
    guard.require_access(&auth, Permission::AssetDelete, &body.ids).await?;
    let service = TrashService::new(&ctx);
    let result = service.soft_delete(&body.ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

#[derive(Debug, Deserialize)]
pub struct RestoreAssetsRequest {
    #[serde(default)]
    ids: Option<Vec<Uuid>>,
}

/// `POST /api/trash/restore` — `restore(ids[] | all)` (§4.8). Omitting
/// `ids` restores every trashed asset the caller owns.
#[actix_web::post("/api/trash/restore")]
pub async fn restore(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<RestoreAssetsRequest>,
) -> AppResult<HttpResponse> {
    let service = TrashService::new(&ctx);
    let result = service.restore(auth.user_id(), body.ids.as_deref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

/// `POST /api/trash/empty` — `empty(user)` (§4.8): permanently purges the
/// caller's trash.
#[actix_web::post("/api/trash/empty")]
pub async fn empty(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let service = TrashService::new(&ctx);
    let result = service.empty(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(delete_assets).service(restore).service(empty);
}
