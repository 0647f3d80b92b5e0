use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::access::{AccessGuard, Permission};
use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::AppResult;

use super::domain::CreateActivityRequest;
use super::service::ActivityService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    album_id: Uuid,
    #[serde(default)]
    asset_id: Option<Uuid>,
}

#[actix_web::get("/api/activities")]
pub async fn list(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    guard.require_access(&auth, Permission::AlbumRead, &[query.album_id]).await?;
    let service = ActivityService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.list(query.album_id, query.asset_id).await?)))
}

#[actix_web::post("/api/activities")]
pub async fn create(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    body: web::Json<CreateActivityRequest>,
) -> AppResult<HttpResponse> {
    guard
        .require_access(&auth, Permission::ActivityCreate, &[body.album_id])
        .await?;
    let service = ActivityService::new(&ctx);
    let activity = service
        .create(auth.user_id(), body.album_id, body.asset_id, body.is_liked, body.comment.clone())
        .await?;
    Ok(ApiResponse::created(activity))
}

#[actix_web::delete("/api/activities/{id}")]
pub async fn delete(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = ActivityService::new(&ctx);
    service.delete(path.into_inner(), auth.user_id()).await?;
    Ok(ApiResponse::no_content())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(create).service(delete);
}
