use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::album_user::AlbumUserRole;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub album_name: String,
    pub description: String,
    pub album_thumbnail_asset_id: Option<Uuid>,
    pub is_activity_enabled: bool,
    pub asset_count: u64,
    pub shared_users: Vec<AlbumUserEntry>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUserEntry {
    pub user_id: Uuid,
    pub role: &'static str,
}

pub fn role_str(role: &AlbumUserRole) -> &'static str {
    match role {
        AlbumUserRole::Editor => "editor",
        AlbumUserRole::Viewer => "viewer",
    }
}

/// Fields an album create/update request may set — patch semantics (§3.1
/// `Album`), shared by both handlers since an update is a create with
/// everything optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPatch {
    pub album_name: Option<String>,
    pub description: Option<String>,
    pub album_thumbnail_asset_id: Option<Uuid>,
    pub is_activity_enabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_str_matches_album_user_entry_rendering() {
        assert_eq!(role_str(&AlbumUserRole::Editor), "editor");
        assert_eq!(role_str(&AlbumUserRole::Viewer), "viewer");
    }

    #[test]
    fn patch_with_no_fields_deserializes_to_default() {
        let patch: AlbumPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.album_name.is_none());
        assert!(patch.album_thumbnail_asset_id.is_none());
    }

    #[test]
    fn patch_only_sets_provided_fields() {
        let patch: AlbumPatch = serde_json::from_str(r#"{"albumName":"Trip"}"#).unwrap();
        assert_eq!(patch.album_name.as_deref(), Some("Trip"));
        assert!(patch.description.is_none());
    }
}
