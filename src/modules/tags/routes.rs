use actix_web::web::{self};
use actix_web::HttpResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::AppResult;

use super::domain::{CreateTagRequest, TagPatch};
use super::service::TagsService;

#[actix_web::post("/api/tags")]
pub async fn create(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    let service = TagsService::new(&ctx);
    let tag = service
        .create(auth.user_id(), body.value.clone(), body.color.clone(), body.parent_id)
        .await?;
    Ok(ApiResponse::created(tag))
}

#[actix_web::get("/api/tags")]
pub async fn list(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let service = TagsService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.list(auth.user_id()).await?)))
}

#[actix_web::put("/api/tags/{id}")]
pub async fn update(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<TagPatch>,
) -> AppResult<HttpResponse> {
    let service = TagsService::new(&ctx);
    let tag = service.update(path.into_inner(), auth.user_id(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(tag)))
}

#[actix_web::delete("/api/tags/{id}")]
pub async fn delete(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = TagsService::new(&ctx);
    service.delete(path.into_inner(), auth.user_id()).await?;
    Ok(ApiResponse::no_content())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAssetIdsRequest {
    ids: Vec<Uuid>,
}

#[actix_web::put("/api/tags/{id}/assets")]
pub async fn tag_assets(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<TagAssetIdsRequest>,
) -> AppResult<HttpResponse> {
    let service = TagsService::new(&ctx);
    let added = service.tag_assets(path.into_inner(), auth.user_id(), &body.ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "added": added }))))
}

#[actix_web::delete("/api/tags/{id}/assets")]
pub async fn untag_assets(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<TagAssetIdsRequest>,
) -> AppResult<HttpResponse> {
    let service = TagsService::new(&ctx);
    let removed = service.untag_assets(path.into_inner(), auth.user_id(), &body.ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "removed": removed }))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(list)
        .service(update)
        .service(delete)
        .service(tag_assets)
        .service(untag_assets);
}
