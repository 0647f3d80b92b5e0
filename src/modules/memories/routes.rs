use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::AppResult;

use super::domain::{CreateMemoryRequest, MemoryPatch};
use super::service::MemoriesService;

#[actix_web::post("/api/memories")]
pub async fn create(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<CreateMemoryRequest>,
) -> AppResult<HttpResponse> {
    let service = MemoriesService::new(&ctx);
    let memory = service
        .create(
            auth.user_id(),
            body.r#type.clone(),
            body.data.clone(),
            body.memory_at,
            body.is_saved,
            &body.asset_ids,
        )
        .await?;
    Ok(ApiResponse::created(memory))
}

#[actix_web::get("/api/memories")]
pub async fn list(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let service = MemoriesService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.list(auth.user_id()).await?)))
}

#[actix_web::get("/api/memories/{id}")]
pub async fn get(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = MemoriesService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.get(path.into_inner(), auth.user_id()).await?)))
}

#[actix_web::put("/api/memories/{id}")]
pub async fn update(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<MemoryPatch>,
) -> AppResult<HttpResponse> {
    let service = MemoriesService::new(&ctx);
    let memory = service.update(path.into_inner(), auth.user_id(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(memory)))
}

#[actix_web::delete("/api/memories/{id}")]
pub async fn delete(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = MemoriesService::new(&ctx);
    service.delete(path.into_inner(), auth.user_id()).await?;
    Ok(ApiResponse::no_content())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryAssetIdsRequest {
    ids: Vec<Uuid>,
}

#[actix_web::put("/api/memories/{id}/assets")]
pub async fn add_assets(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<MemoryAssetIdsRequest>,
) -> AppResult<HttpResponse> {
    let service = MemoriesService::new(&ctx);
    let added = service.add_assets(path.into_inner(), auth.user_id(), &body.ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "added": added }))))
}

#[actix_web::delete("/api/memories/{id}/assets")]
pub async fn remove_assets(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<MemoryAssetIdsRequest>,
) -> AppResult<HttpResponse> {
    let service = MemoriesService::new(&ctx);
    let removed = service.remove_assets(path.into_inner(), auth.user_id(), &body.ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "removed": removed }))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(list)
        .service(get)
        .service(update)
        .service(delete)
        .service(add_assets)
        .service(remove_assets);
}
