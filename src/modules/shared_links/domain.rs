use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::crypto::hex_encode;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLinkResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Hex-encoded raw key — §6.1 accepts either hex or base64-url on the
    /// way in; hex is what's echoed back on creation.
    pub key: String,
    pub slug: Option<String>,
    pub expires_at: Option<DateTime<FixedOffset>>,
    pub show_exif: bool,
    pub allow_upload: bool,
    pub allow_download: bool,
    pub album_id: Option<Uuid>,
    pub asset_ids: Vec<Uuid>,
}

pub fn to_response(m: crate::entity::shared_link::Model, asset_ids: Vec<Uuid>) -> SharedLinkResponse {
    SharedLinkResponse {
        id: m.id,
        user_id: m.user_id,
        key: hex_encode(&m.key),
        slug: m.slug,
        expires_at: m.expires_at,
        show_exif: m.show_exif,
        allow_upload: m.allow_upload,
        allow_download: m.allow_download,
        album_id: m.album_id,
        asset_ids,
    }
}

/// Exactly one of `albumId`/`assetIds` must be populated (§3.2 invariant 7).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSharedLinkRequest {
    #[serde(default)]
    pub album_id: Option<Uuid>,
    #[serde(default)]
    pub asset_ids: Vec<Uuid>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub show_exif: bool,
    #[serde(default)]
    pub allow_upload: bool,
    #[serde(default)]
    pub allow_download: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLinkPatch {
    pub slug: Option<String>,
    pub expires_at: Option<DateTime<FixedOffset>>,
    pub password: Option<String>,
    pub show_exif: Option<bool>,
    pub allow_upload: Option<bool>,
    pub allow_download: Option<bool>,
}
