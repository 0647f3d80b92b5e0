use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::AppResult;

use super::domain::{CreateSharedLinkRequest, SharedLinkPatch};
use super::service::SharedLinksService;

#[actix_web::post("/api/shared-links")]
pub async fn create(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<CreateSharedLinkRequest>,
) -> AppResult<HttpResponse> {
    let service = SharedLinksService::new(&ctx);
    let link = service.create(auth.user_id(), body.into_inner()).await?;
    Ok(ApiResponse::created(link))
}

#[actix_web::get("/api/shared-links")]
pub async fn list(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let service = SharedLinksService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.list(auth.user_id()).await?)))
}

#[actix_web::get("/api/shared-links/{id}")]
pub async fn get(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = SharedLinksService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.get(path.into_inner(), auth.user_id()).await?)))
}

#[actix_web::patch("/api/shared-links/{id}")]
pub async fn update(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<SharedLinkPatch>,
) -> AppResult<HttpResponse> {
    let service = SharedLinksService::new(&ctx);
    let link = service.update(path.into_inner(), auth.user_id(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(link)))
}

#[actix_web::delete("/api/shared-links/{id}")]
pub async fn delete(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = SharedLinksService::new(&ctx);
    service.delete(path.into_inner(), auth.user_id()).await?;
    Ok(ApiResponse::no_content())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create).service(list).service(get).service(update).service(delete);
}
