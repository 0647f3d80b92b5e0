use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub value: String,
    pub color: Option<String>,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<crate::entity::tag::Model> for TagResponse {
    fn from(m: crate::entity::tag::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            value: m.value,
            color: m.color,
            parent_id: m.parent_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub value: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPatch {
    pub value: Option<String>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_response_maps_from_entity() {
        let model = crate::entity::tag::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            value: "beach".into(),
            color: Some("#ffaa00".into()),
            parent_id: None,
            created_at: chrono::Utc::now().into(),
        };
        let response = TagResponse::from(model.clone());
        assert_eq!(response.value, "beach");
        assert_eq!(response.color.as_deref(), Some("#ffaa00"));
        assert_eq!(response.id, model.id);
    }

    #[test]
    fn create_request_requires_value_but_not_color_or_parent() {
        let req: CreateTagRequest = serde_json::from_str(r#"{"value":"sunset"}"#).unwrap();
        assert_eq!(req.value, "sunset");
        assert!(req.color.is_none());
        assert!(req.parent_id.is_none());
    }
}
