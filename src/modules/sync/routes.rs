use actix_web::{web, HttpResponse};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::auth::domain::AuthContext;
use crate::shared::api::ApiResponse;
use crate::shared::context::ServiceContext;
use crate::shared::error::{AppError, AppResult};

use super::domain::{AckEntry, SyncEntityType};
use super::repo::asset_v1_payload;
use super::service::SyncService;

#[derive(Debug, Deserialize)]
pub struct SyncStreamRequest {
    #[serde(default)]
    reset: bool,
    #[serde(default)]
    types: Option<Vec<String>>,
}

/// `POST /api/sync/stream` — ndjson body (§4.6). One JSON object per line;
/// the whole body is assembled up front rather than written incrementally
/// (see `SyncService::run_stream`).
#[actix_web::post("/api/sync/stream")]
pub async fn stream(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<SyncStreamRequest>,
) -> AppResult<HttpResponse> {
    let session_id = require_session(&auth)?;
    let requested_types = body
        .types
        .as_ref()
        .map(|names| {
            names
                .iter()
                .map(|n| SyncEntityType::parse(n).ok_or_else(|| AppError::BadRequest(format!("unknown sync type: {n}"))))
                .collect::<AppResult<Vec<_>>>()
        })
        .transpose()?;

    let service = SyncService::new(&ctx);
    let lines = service
        .run_stream(auth.user_id(), session_id, body.reset, requested_types.as_deref())
        .await?;

    let mut body = String::new();
    for line in &lines {
        body.push_str(&line.to_ndjson_line());
    }

    Ok(HttpResponse::Ok().content_type("application/x-ndjson").body(body))
}

#[derive(Debug, Deserialize)]
pub struct AckRequest {
    acks: Vec<AckItem>,
}

#[derive(Debug, Deserialize)]
pub struct AckItem {
    #[serde(rename = "type")]
    ty: String,
    update_id: Uuid,
}

/// `POST /api/sync/ack` — batch ack ingestion.
#[actix_web::post("/api/sync/ack")]
pub async fn ack(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<AckRequest>,
) -> AppResult<HttpResponse> {
    let session_id = require_session(&auth)?;
    let entries = body
        .acks
        .iter()
        .map(|item| {
            SyncEntityType::parse(&item.ty)
                .map(|entity_type| AckEntry { entity_type, update_id: item.update_id })
                .ok_or_else(|| AppError::BadRequest(format!("unknown ack type: {}", item.ty)))
        })
        .collect::<AppResult<Vec<_>>>()?;

    let service = SyncService::new(&ctx);
    service.ack(session_id, &entries).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({}))))
}

/// `GET /api/sync/ack` — list this session's current checkpoints.
#[actix_web::get("/api/sync/ack")]
pub async fn list_ack(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let session_id = require_session(&auth)?;
    let mut rows = Vec::new();
    for ty in super::domain::ENTITY_TYPE_ORDER.iter().copied() {
        if let Some(cp) = super::repo::load_checkpoint(&ctx.db, session_id, ty).await? {
            rows.push(serde_json::json!({ "type": ty.as_str(), "updateId": cp.update_id, "updatedAt": cp.updated_at }));
        }
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(rows)))
}

/// `DELETE /api/sync/ack` — clear this session's checkpoints, forcing a
/// reset on the next stream call.
#[actix_web::delete("/api/sync/ack")]
pub async fn clear_ack(ctx: web::Data<ServiceContext>, auth: AuthContext) -> AppResult<HttpResponse> {
    let session_id = require_session(&auth)?;
    let service = SyncService::new(&ctx);
    service.clear_checkpoints(session_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({}))))
}

#[derive(Debug, Deserialize)]
pub struct FullSyncRequest {
    last_id: Option<Uuid>,
    updated_until: String,
    #[serde(default = "default_full_sync_limit")]
    limit: u64,
}

fn default_full_sync_limit() -> u64 {
    1000
}

#[derive(Debug, Serialize)]
struct FullSyncResponse {
    assets: Vec<serde_json::Value>,
}

/// `POST /api/sync/full-sync` — legacy pre-streaming protocol.
#[actix_web::post("/api/sync/full-sync")]
pub async fn full_sync(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<FullSyncRequest>,
) -> AppResult<HttpResponse> {
    let updated_until = parse_datetime(&body.updated_until)?;
    let service = SyncService::new(&ctx);
    let assets = service
        .full_sync(auth.user_id(), body.last_id, updated_until, body.limit)
        .await?;
    let assets = assets.iter().map(asset_v1_payload).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(FullSyncResponse { assets })))
}

#[derive(Debug, Deserialize)]
pub struct DeltaSyncRequest {
    user_ids: Vec<Uuid>,
    updated_after: String,
}

#[derive(Debug, Serialize)]
struct DeltaSyncResponse {
    needs_full_sync: bool,
    upserted: Vec<serde_json::Value>,
    deleted: Vec<Uuid>,
}

/// `POST /api/sync/delta-sync` — legacy pre-streaming protocol.
#[actix_web::post("/api/sync/delta-sync")]
pub async fn delta_sync(
    ctx: web::Data<ServiceContext>,
    auth: AuthContext,
    body: web::Json<DeltaSyncRequest>,
) -> AppResult<HttpResponse> {
    let updated_after = parse_datetime(&body.updated_after)?;
    let service = SyncService::new(&ctx);
    let result = service
        .delta_sync(auth.user_id(), &body.user_ids, updated_after)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(DeltaSyncResponse {
        needs_full_sync: result.needs_full_sync,
        upserted: result.upserted.iter().map(asset_v1_payload).collect(),
        deleted: result.deleted,
    })))
}

fn parse_datetime(raw: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).map_err(|_| AppError::BadRequest(format!("invalid timestamp: {raw}")))
}

/// Sync checkpoints are keyed by session; API-key and shared-link principals
/// have no session row to checkpoint against.
fn require_session(auth: &AuthContext) -> AppResult<Uuid> {
    match &auth.principal {
        crate::modules::auth::domain::Principal::User { session_id, .. } => Ok(*session_id),
        _ => Err(AppError::BadRequest("sync requires a user session".into())),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(stream)
        .service(ack)
        .service(list_ack)
        .service(clear_ack)
        .service(full_sync)
        .service(delta_sync);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_rejects_non_rfc3339() {
        assert!(parse_datetime("not-a-date").is_err());
    }
}
