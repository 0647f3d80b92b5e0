use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::entity::{session, user};
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::crypto::{bcrypt_compare, hex_encode, random_bytes, sha256_hex};
use crate::shared::error::{AppError, AppResult};
use crate::shared::ids::new_id;

use super::domain::AuthContext;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default = "default_device_os")]
    pub device_os: String,
}

fn default_device_type() -> String {
    "unknown".to_string()
}

fn default_device_os() -> String {
    "unknown".to_string()
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: uuid::Uuid,
    pub access_token: String,
    pub is_admin: bool,
}

/// §6.1 cookie max-age: 400 days, matching the protocol's own Max-Age.
const SESSION_COOKIE_MAX_AGE_SECS: i64 = 400 * 24 * 60 * 60;

#[actix_web::post("/api/auth/login")]
pub async fn login(
    ctx: web::Data<ServiceContext>,
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let found = user::Entity::find()
        .filter(user::Column::Email.eq(body.email.to_lowercase()))
        .filter(user::Column::DeletedAt.is_null())
        .one(&ctx.db)
        .await?;

    let user = found.ok_or(AppError::Unauthorized)?;

    let matches = bcrypt_compare(&body.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.into()))?;
    if !matches {
        return Err(AppError::Unauthorized);
    }

    let raw_token = hex_encode(&random_bytes(32));
    let token_hash = sha256_hex(raw_token.as_bytes());

    let active = session::ActiveModel {
        id: sea_orm::ActiveValue::Set(new_id()),
        user_id: sea_orm::ActiveValue::Set(user.id),
        token_hash: sea_orm::ActiveValue::Set(token_hash),
        expires_at: sea_orm::ActiveValue::Set(None),
        updated_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        pin_expires_at: sea_orm::ActiveValue::Set(None),
        device_os: sea_orm::ActiveValue::Set(body.device_os.clone()),
        device_type: sea_orm::ActiveValue::Set(body.device_type.clone()),
        app_version: sea_orm::ActiveValue::Set(None),
        is_pending_sync_reset: sea_orm::ActiveValue::Set(false),
        parent_id: sea_orm::ActiveValue::Set(None),
        created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
    };

    super::repo::create_session(&ctx.db, active).await?;

    let is_secure = req.connection_info().scheme() == "https";

    let mut response = HttpResponse::Ok().json(ApiResponse::success(LoginResponse {
        user_id: user.id,
        access_token: raw_token.clone(),
        is_admin: user.is_admin,
    }));

    for (name, value, http_only) in [
        ("immich_access_token", raw_token.clone(), true),
        ("immich_auth_type", "password".to_string(), true),
        ("immich_is_authenticated", "true".to_string(), false),
    ] {
        let cookie = Cookie::build(name, value)
            .http_only(http_only)
            .secure(is_secure)
            .same_site(SameSite::Lax)
            .max_age(actix_web::cookie::time::Duration::seconds(
                SESSION_COOKIE_MAX_AGE_SECS,
            ))
            .path("/")
            .finish();
        response.add_cookie(&cookie).ok();
    }

    Ok(response)
}

#[actix_web::post("/api/auth/logout")]
pub async fn logout(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    if let super::domain::Principal::User { session_id, .. } = auth.principal {
        super::repo::delete_session(&ctx.db, session_id).await?;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({ "successful": true }))))
}

#[actix_web::get("/api/auth/validateToken")]
pub async fn validate_token(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "authStatus": true,
        "userId": auth.user_id(),
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout).service(validate_token);
}
