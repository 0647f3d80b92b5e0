use chrono::Utc;
use uuid::Uuid;

use crate::shared::context::ServiceContext;
use crate::shared::crypto::sha256_hex;
use crate::shared::error::{AppError, AppResult};

use super::domain::{AuthContext, Principal};
use super::repo;

/// Raw, not-yet-verified values pulled from headers/query/cookies by the
/// extractor, in the exact priority order of §6.1.
#[derive(Debug, Default, Clone)]
pub struct RawCredentials {
    pub share_key: Option<String>,
    pub share_slug: Option<String>,
    pub session_token: Option<String>,
    pub api_key: Option<String>,
}

/// Decodes a shared-link key, tolerating 100-char hex or base64-url input,
/// and returns it as raw bytes for a constant-time-ish equality check.
fn decode_share_key(raw: &str) -> Option<Vec<u8>> {
    if raw.len() == 100 && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        let mut out = Vec::with_capacity(50);
        let bytes = raw.as_bytes();
        for chunk in bytes.chunks(2) {
            let hi = (chunk[0] as char).to_digit(16)?;
            let lo = (chunk[1] as char).to_digit(16)?;
            out.push(((hi << 4) | lo) as u8);
        }
        return Some(out);
    }

    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(raw)
        .ok()
        .or_else(|| base64::engine::general_purpose::URL_SAFE.decode(raw).ok())
}

pub async fn resolve(ctx: &ServiceContext, creds: RawCredentials) -> AppResult<AuthContext> {
    if let Some(raw_key) = creds.share_key.as_deref() {
        let key_bytes = decode_share_key(raw_key).ok_or(AppError::Unauthorized)?;
        let link = repo::find_shared_link_by_key(&ctx.db, &key_bytes)
            .await?
            .ok_or(AppError::Unauthorized)?;
        return principal_from_link(link);
    }

    if let Some(slug) = creds.share_slug.as_deref() {
        let link = repo::find_shared_link_by_slug(&ctx.db, slug)
            .await?
            .ok_or(AppError::Unauthorized)?;
        return principal_from_link(link);
    }

    if let Some(token) = creds.session_token.as_deref() {
        let hash = sha256_hex(token.as_bytes());
        let session = repo::find_session_by_token_hash(&ctx.db, &hash)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if let Some(expires_at) = session.expires_at {
            if expires_at < Utc::now() {
                return Err(AppError::Unauthorized);
            }
        }

        let has_elevated_permission = pin_elevated(ctx, session.id).await;
        if has_elevated_permission {
            extend_pin_if_near_expiry(ctx, session.id).await;
        }

        repo::touch_session(&ctx.db, session.id).await;

        let user = repo::find_user_for_session(&ctx.db, session.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        return Ok(AuthContext {
            principal: Principal::User {
                user_id: session.user_id,
                session_id: session.id,
                is_admin: user.is_admin,
            },
            has_elevated_permission,
        });
    }

    if let Some(raw_key) = creds.api_key.as_deref() {
        let hash = sha256_hex(raw_key.as_bytes());
        let key = repo::find_api_key_by_key_hash(&ctx.db, &hash)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let permissions: Vec<String> = serde_json::from_value(key.permissions).unwrap_or_default();

        return Ok(AuthContext {
            principal: Principal::ApiKey {
                user_id: key.user_id,
                key_id: key.id,
                permissions,
            },
            has_elevated_permission: false,
        });
    }

    Err(AppError::Unauthorized)
}

fn principal_from_link(link: crate::entity::shared_link::Model) -> AppResult<AuthContext> {
    if let Some(expires_at) = link.expires_at {
        if expires_at < Utc::now() {
            return Err(AppError::Unauthorized);
        }
    }

    Ok(AuthContext {
        principal: Principal::SharedLink {
            link_id: link.id,
            owner_id: link.user_id,
            allow_upload: link.allow_upload,
            allow_download: link.allow_download,
            show_exif: link.show_exif,
            album_id: link.album_id,
        },
        has_elevated_permission: false,
    })
}

/// §5: pin-unlock flag, read from the best-effort KV cache. A cache miss or
/// error reads as "not elevated" — never promotes a session by accident.
async fn pin_elevated(ctx: &ServiceContext, session_id: Uuid) -> bool {
    let key = format!("session:{session_id}:pin_elevated");
    ctx.kv.get(&key).await.is_some()
}

/// §5: auto-extend the pin-unlock flag by 5 minutes when within 5 minutes of
/// expiring. Fire-and-forget; failures are swallowed by `Kv` itself.
async fn extend_pin_if_near_expiry(ctx: &ServiceContext, session_id: Uuid) {
    let key = format!("session:{session_id}:pin_elevated");
    if let Some(ttl) = ctx.kv.ttl_secs(&key).await {
        if ttl < 300 {
            ctx.kv.expire(&key, 300).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_share_key_accepts_100_char_hex() {
        let hex: String = "ab".repeat(50);
        let decoded = decode_share_key(&hex).unwrap();
        assert_eq!(decoded.len(), 50);
        assert_eq!(decoded[0], 0xab);
    }

    #[test]
    fn decode_share_key_rejects_garbage() {
        assert!(decode_share_key("not-valid-##").is_none());
    }
}
