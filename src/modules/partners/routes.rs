use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::access::{AccessGuard, Permission};
use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{CreatePartnerRequest, Direction, UpdatePartnerRequest};
use super::service::PartnersService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    direction: String,
}

#[actix_web::get("/api/partners")]
pub async fn list(ctx: web::Data<ServiceContext>, auth: AuthContext, query: web::Query<ListQuery>) -> AppResult<HttpResponse> {
    let direction = Direction::parse(&query.direction)
        .ok_or_else(|| AppError::BadRequest(format!("unknown direction: {}", query.direction)))?;
    let service = PartnersService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.list(auth.user_id(), direction).await?)))
}

#[actix_web::post("/api/partners")]
pub async fn create(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<CreatePartnerRequest>,
) -> AppResult<HttpResponse> {
    let service = PartnersService::new(&ctx);
    let partner = service.create(auth.user_id(), body.shared_with_id).await?;
    Ok(ApiResponse::created(partner))
}

#[actix_web::put("/api/partners/{id}")]
pub async fn update(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePartnerRequest>,
) -> AppResult<HttpResponse> {
    let shared_by_id = path.into_inner();
    guard.require_access(&auth, Permission::PartnerUpdate, &[shared_by_id]).await?;
    let service = PartnersService::new(&ctx);
    let partner = service.set_in_timeline(shared_by_id, auth.user_id(), body.in_timeline).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(partner)))
}

#[actix_web::delete("/api/partners/{id}")]
pub async fn delete(ctx: web::Data<ServiceContext>, auth: AuthContext, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let service = PartnersService::new(&ctx);
    service.delete(auth.user_id(), path.into_inner()).await?;
    Ok(ApiResponse::no_content())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(create).service(update).service(delete);
}
