use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub album_id: Uuid,
    pub asset_id: Option<Uuid>,
    pub is_liked: bool,
    pub comment: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<crate::entity::activity::Model> for ActivityResponse {
    fn from(m: crate::entity::activity::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            album_id: m.album_id,
            asset_id: m.asset_id,
            is_liked: m.is_liked,
            comment: m.comment,
            created_at: m.created_at,
        }
    }
}

/// Either a like or a comment — §3.1 `Activity` doesn't separate the two
/// into distinct rows, so one of `isLiked`/`comment` is expected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub album_id: Uuid,
    #[serde(default)]
    pub asset_id: Option<Uuid>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_response_maps_from_entity() {
        let model = crate::entity::activity::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            album_id: Uuid::new_v4(),
            asset_id: None,
            is_liked: true,
            comment: None,
            created_at: chrono::Utc::now().into(),
        };
        let response = ActivityResponse::from(model.clone());
        assert!(response.is_liked);
        assert_eq!(response.album_id, model.album_id);
    }

    #[test]
    fn create_request_defaults_like_and_comment_to_absent() {
        let req: CreateActivityRequest =
            serde_json::from_str(&format!(r#"{{"albumId":"{}"}}"#, Uuid::new_v4())).unwrap();
        assert!(!req.is_liked);
        assert!(req.comment.is_none());
        assert!(req.asset_id.is_none());
    }
}
