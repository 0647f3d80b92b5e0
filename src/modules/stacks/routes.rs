use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::AppResult;

use super::domain::{CreateStackRequest, UpdateStackRequest};
use super::service::StacksService;

#[actix_web::post("/api/stacks")]
pub async fn create(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<CreateStackRequest>,
) -> AppResult<HttpResponse> {
    let service = StacksService::new(&ctx);
    let stack = service.create(auth.user_id(), &body.asset_ids, body.primary_asset_id).await?;
    Ok(ApiResponse::created(stack))
}

#[actix_web::get("/api/stacks/{id}")]
pub async fn get(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = StacksService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.get(path.into_inner(), auth.user_id()).await?)))
}

#[actix_web::put("/api/stacks/{id}")]
pub async fn update(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStackRequest>,
) -> AppResult<HttpResponse> {
    let service = StacksService::new(&ctx);
    let stack = service
        .set_primary(path.into_inner(), auth.user_id(), body.primary_asset_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(stack)))
}

#[actix_web::delete("/api/stacks/{id}")]
pub async fn delete(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = StacksService::new(&ctx);
    service.delete(path.into_inner(), auth.user_id()).await?;
    Ok(ApiResponse::no_content())
}

#[actix_web::delete("/api/stacks/{id}/assets/{assetId}")]
pub async fn remove_asset(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (stack_id, asset_id) = path.into_inner();
    let service = StacksService::new(&ctx);
    service.remove_asset(stack_id, auth.user_id(), asset_id).await?;
    Ok(ApiResponse::no_content())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create).service(get).service(update).service(delete).service(remove_asset);
}
