use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::entity::album_user::AlbumUserRole;
use crate::modules::access::{AccessGuard, Permission};
use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::AlbumPatch;
use super::service::AlbumsService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    album_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    asset_ids: Vec<Uuid>,
}

#[actix_web::post("/api/albums")]
pub async fn create(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<CreateAlbumRequest>,
) -> AppResult<HttpResponse> {
    let service = AlbumsService::new(&ctx);
    let album = service
        .create(auth.user_id(), body.album_name.clone(), body.description.clone(), &body.asset_ids)
        .await?;
    Ok(ApiResponse::created(album))
}

#[actix_web::get("/api/albums")]
pub async fn list(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let service = AlbumsService::new(&ctx);
    let albums = service.list(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(albums)))
}

#[actix_web::get("/api/albums/{id}")]
pub async fn get(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let album_id = path.into_inner();
    guard.require_access(&auth, Permission::AlbumRead, &[album_id]).await?;
    let service = AlbumsService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.get(album_id).await?)))
}

#[actix_web::patch("/api/albums/{id}")]
pub async fn update(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<AlbumPatch>,
) -> AppResult<HttpResponse> {
    let album_id = path.into_inner();
    guard.require_access(&auth, Permission::AlbumUpdate, &[album_id]).await?;
    let service = AlbumsService::new(&ctx);
    Ok(HttpResponse::Ok().json(ApiResponse::success(service.update(album_id, body.into_inner()).await?)))
}

#[actix_web::delete("/api/albums/{id}")]
pub async fn delete(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let album_id = path.into_inner();
    guard.require_access(&auth, Permission::AlbumDelete, &[album_id]).await?;
    let service = AlbumsService::new(&ctx);
    service.delete(album_id).await?;
    Ok(ApiResponse::no_content())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIdsRequest {
    ids: Vec<Uuid>,
}

#[actix_web::put("/api/albums/{id}/assets")]
pub async fn add_assets(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<AssetIdsRequest>,
) -> AppResult<HttpResponse> {
    let album_id = path.into_inner();
    guard.require_access(&auth, Permission::AlbumUpdate, &[album_id]).await?;
    let service = AlbumsService::new(&ctx);
    let added = service.add_assets(album_id, &body.ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "added": added }))))
}

#[actix_web::delete("/api/albums/{id}/assets")]
pub async fn remove_assets(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<AssetIdsRequest>,
) -> AppResult<HttpResponse> {
    let album_id = path.into_inner();
    guard.require_access(&auth, Permission::AlbumUpdate, &[album_id]).await?;
    let service = AlbumsService::new(&ctx);
    let removed = service.remove_assets(album_id, &body.ids).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "removed": removed }))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUserGrant {
    user_id: Uuid,
    #[serde(default = "default_role")]
    role: String,
}

fn default_role() -> String {
    "editor".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUsersRequest {
    album_users: Vec<AlbumUserGrant>,
}

fn parse_role(raw: &str) -> AppResult<AlbumUserRole> {
    match raw {
        "editor" => Ok(AlbumUserRole::Editor),
        "viewer" => Ok(AlbumUserRole::Viewer),
        other => Err(AppError::BadRequest(format!("unknown album role: {other}"))),
    }
}

#[actix_web::put("/api/albums/{id}/users")]
pub async fn add_users(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    body: web::Json<AddUsersRequest>,
) -> AppResult<HttpResponse> {
    let album_id = path.into_inner();
    guard.require_access(&auth, Permission::AlbumShare, &[album_id]).await?;
    let users = body
        .album_users
        .iter()
        .map(|g| Ok((g.user_id, parse_role(&g.role)?)))
        .collect::<AppResult<Vec<_>>>()?;
    let service = AlbumsService::new(&ctx);
    service.add_users(album_id, &users).await?;
    Ok(ApiResponse::no_content())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRoleRequest {
    role: String,
}

#[actix_web::put("/api/albums/{id}/user/{userId}")]
pub async fn update_user_role(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateUserRoleRequest>,
) -> AppResult<HttpResponse> {
    let (album_id, user_id) = path.into_inner();
    guard.require_access(&auth, Permission::AlbumShare, &[album_id]).await?;
    let role = parse_role(&body.role)?;
    let service = AlbumsService::new(&ctx);
    service.update_user_role(album_id, user_id, role).await?;
    Ok(ApiResponse::no_content())
}

#[actix_web::delete("/api/albums/{id}/user/{userId}")]
pub async fn remove_user(
    ctx: web::Data<ServiceContext>,
    guard: web::Data<AccessGuard>,
    auth: AuthContext,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (album_id, user_id) = path.into_inner();
    guard.require_access(&auth, Permission::AlbumShare, &[album_id]).await?;
    let service = AlbumsService::new(&ctx);
    service.remove_user(album_id, user_id).await?;
    Ok(ApiResponse::no_content())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(list)
        .service(get)
        .service(update)
        .service(delete)
        .service(add_assets)
        .service(remove_assets)
        .service(add_users)
        .service(update_user_role)
        .service(remove_user);
}
