use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub r#type: String,
    pub data: serde_json::Value,
    pub is_saved: bool,
    pub memory_at: DateTime<FixedOffset>,
    pub seen_at: Option<DateTime<FixedOffset>>,
    pub asset_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemoryRequest {
    pub r#type: String,
    pub data: serde_json::Value,
    pub memory_at: DateTime<FixedOffset>,
    #[serde(default)]
    pub is_saved: bool,
    #[serde(default)]
    pub asset_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPatch {
    pub is_saved: Option<bool>,
    /// Setting this to `true` stamps `seenAt = now`; spec.md names no
    /// un-seeing operation, so `false` is accepted but ignored.
    pub is_seen: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_with_no_fields_deserializes_to_default() {
        let patch: MemoryPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_saved.is_none());
        assert!(patch.is_seen.is_none());
    }

    #[test]
    fn create_request_rejects_missing_memory_at() {
        let result = serde_json::from_str::<CreateMemoryRequest>(r#"{"type":"on_this_day","data":{}}"#);
        assert!(result.is_err());
    }
}
