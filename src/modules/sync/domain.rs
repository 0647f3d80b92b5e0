use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// §4.6 fixed topological order. A client only ever sees a child after its
/// parent because types are scanned strictly in this sequence within one
/// stream.
pub const ENTITY_TYPE_ORDER: &[SyncEntityType] = &[
    SyncEntityType::AuthUsersV1,
    SyncEntityType::UsersV1,
    SyncEntityType::PartnersV1,
    SyncEntityType::AssetsV1,
    SyncEntityType::StacksV1,
    SyncEntityType::PartnerAssetsV1,
    SyncEntityType::PartnerStacksV1,
    SyncEntityType::AlbumAssetsV1,
    SyncEntityType::AlbumsV1,
    SyncEntityType::AlbumUsersV1,
    SyncEntityType::AlbumToAssetsV1,
    SyncEntityType::AssetExifsV1,
    SyncEntityType::AlbumAssetExifsV1,
    SyncEntityType::PartnerAssetExifsV1,
    SyncEntityType::MemoriesV1,
    SyncEntityType::MemoryToAssetsV1,
    SyncEntityType::PeopleV1,
    SyncEntityType::AssetFacesV1,
    SyncEntityType::UserMetadataV1,
    SyncEntityType::AssetMetadataV1,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncEntityType {
    AuthUsersV1,
    UsersV1,
    PartnersV1,
    AssetsV1,
    StacksV1,
    PartnerAssetsV1,
    PartnerStacksV1,
    AlbumAssetsV1,
    AlbumsV1,
    AlbumUsersV1,
    AlbumToAssetsV1,
    AssetExifsV1,
    AlbumAssetExifsV1,
    PartnerAssetExifsV1,
    MemoriesV1,
    MemoryToAssetsV1,
    PeopleV1,
    AssetFacesV1,
    UserMetadataV1,
    AssetMetadataV1,
    /// Not in `ENTITY_TYPE_ORDER` — emitted out of band at stream start/end.
    SyncResetV1,
    SyncCompleteV1,
}

impl SyncEntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthUsersV1 => "AuthUsersV1",
            Self::UsersV1 => "UsersV1",
            Self::PartnersV1 => "PartnersV1",
            Self::AssetsV1 => "AssetsV1",
            Self::StacksV1 => "StacksV1",
            Self::PartnerAssetsV1 => "PartnerAssetsV1",
            Self::PartnerStacksV1 => "PartnerStacksV1",
            Self::AlbumAssetsV1 => "AlbumAssetsV1",
            Self::AlbumsV1 => "AlbumsV1",
            Self::AlbumUsersV1 => "AlbumUsersV1",
            Self::AlbumToAssetsV1 => "AlbumToAssetsV1",
            Self::AssetExifsV1 => "AssetExifsV1",
            Self::AlbumAssetExifsV1 => "AlbumAssetExifsV1",
            Self::PartnerAssetExifsV1 => "PartnerAssetExifsV1",
            Self::MemoriesV1 => "MemoriesV1",
            Self::MemoryToAssetsV1 => "MemoryToAssetsV1",
            Self::PeopleV1 => "PeopleV1",
            Self::AssetFacesV1 => "AssetFacesV1",
            Self::UserMetadataV1 => "UserMetadataV1",
            Self::AssetMetadataV1 => "AssetMetadataV1",
            Self::SyncResetV1 => "SyncResetV1",
            Self::SyncCompleteV1 => "SyncCompleteV1",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        ENTITY_TYPE_ORDER
            .iter()
            .copied()
            .chain([Self::SyncResetV1, Self::SyncCompleteV1])
            .find(|t| t.as_str() == raw)
    }

    /// §9 open question 2 ("backfill sync types... scan logic is empty"),
    /// extended here to cover every type whose backing table carries neither
    /// an `updateId` watermark nor a matching `*_audit` delete table in this
    /// data model (§3.1 only assigns `updateId` to Asset/Album/Memory/Stack/
    /// Partner/Exif rows) — see DESIGN.md. Clients must reconstruct this
    /// state from the owned types alone; the type stays in the ordering so
    /// the client's type-loop remains valid.
    pub fn is_stub(self) -> bool {
        matches!(
            self,
            Self::PeopleV1
                | Self::AssetFacesV1
                | Self::PartnerAssetsV1
                | Self::PartnerStacksV1
                | Self::AlbumAssetsV1
                | Self::AlbumAssetExifsV1
                | Self::PartnerAssetExifsV1
                | Self::UserMetadataV1
                | Self::AuthUsersV1
                | Self::UsersV1
                | Self::AssetMetadataV1
        )
    }
}

/// One ndjson line (§6.3): `{type, ids, data}`.
#[derive(Debug, Serialize)]
pub struct SyncLine {
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub ids: Vec<String>,
    pub data: Value,
}

impl SyncLine {
    pub fn upsert(ty: SyncEntityType, watermark: Uuid, data: Value) -> Self {
        Self {
            ty: ty.as_str(),
            ids: vec![watermark.to_string()],
            data,
        }
    }

    pub fn delete(ty: SyncEntityType, watermark: Uuid, data: Value) -> Self {
        Self {
            ty: ty.as_str(),
            ids: vec![watermark.to_string()],
            data,
        }
    }

    pub fn reset() -> Self {
        Self {
            ty: SyncEntityType::SyncResetV1.as_str(),
            ids: vec!["reset".to_string()],
            data: serde_json::json!({}),
        }
    }

    pub fn complete(now_id: Uuid) -> Self {
        Self {
            ty: SyncEntityType::SyncCompleteV1.as_str(),
            ids: vec![now_id.to_string()],
            data: serde_json::json!({}),
        }
    }

    pub fn to_ndjson_line(&self) -> String {
        let mut s = serde_json::to_string(self).expect("SyncLine always serializes");
        s.push('\n');
        s
    }
}

/// §4.6 staleness rule: `unix_ms = int(updateId.hex[0:12], 16)`.
pub fn is_stale(checkpoint_update_id: Uuid, now_ms: i64, stale_days: i64) -> bool {
    let ts_ms = crate::shared::ids::timestamp_ms_of(checkpoint_update_id);
    let stale_ms = stale_days * 24 * 60 * 60 * 1000;
    now_ms - ts_ms > stale_ms
}

#[derive(Debug, Clone)]
pub struct AckEntry {
    pub entity_type: SyncEntityType,
    pub update_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ids::id_at;

    #[test]
    fn order_contains_every_non_out_of_band_type() {
        assert_eq!(ENTITY_TYPE_ORDER.len(), 20);
        assert!(!ENTITY_TYPE_ORDER.contains(&SyncEntityType::SyncCompleteV1));
    }

    #[test]
    fn is_stale_detects_checkpoints_older_than_threshold() {
        let old = id_at(0);
        assert!(is_stale(old, 31 * 24 * 60 * 60 * 1000, 30));
        let fresh = id_at(10 * 24 * 60 * 60 * 1000);
        assert!(!is_stale(fresh, 11 * 24 * 60 * 60 * 1000, 30));
    }

    #[test]
    fn parse_round_trips_as_str() {
        assert_eq!(SyncEntityType::parse("AssetsV1"), Some(SyncEntityType::AssetsV1));
        assert_eq!(SyncEntityType::parse("bogus"), None);
    }
}
