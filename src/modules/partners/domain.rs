use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerResponse {
    pub shared_by_id: Uuid,
    pub shared_with_id: Uuid,
    pub in_timeline: bool,
}

impl From<crate::entity::partner::Model> for PartnerResponse {
    fn from(m: crate::entity::partner::Model) -> Self {
        Self {
            shared_by_id: m.shared_by_id,
            shared_with_id: m.shared_with_id,
            in_timeline: m.in_timeline,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerRequest {
    pub shared_with_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartnerRequest {
    pub in_timeline: bool,
}

/// `GET /api/partners?direction=` (§6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Partners the caller shares their own library with.
    SharedBy,
    /// Partners who share their library with the caller.
    SharedWith,
}

impl Direction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "shared-by" => Some(Self::SharedBy),
            "shared-with" => Some(Self::SharedWith),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_known_values() {
        assert_eq!(Direction::parse("shared-by"), Some(Direction::SharedBy));
        assert_eq!(Direction::parse("shared-with"), Some(Direction::SharedWith));
    }

    #[test]
    fn direction_rejects_unknown_values() {
        assert_eq!(Direction::parse("bogus"), None);
        assert_eq!(Direction::parse(""), None);
    }

    #[test]
    fn partner_response_maps_from_entity() {
        let model = crate::entity::partner::Model {
            shared_by_id: Uuid::new_v4(),
            shared_with_id: Uuid::new_v4(),
            in_timeline: true,
            update_id: Uuid::new_v4(),
            created_at: chrono::Utc::now().into(),
        };
        let response = PartnerResponse::from(model.clone());
        assert_eq!(response.shared_by_id, model.shared_by_id);
        assert_eq!(response.shared_with_id, model.shared_with_id);
        assert!(response.in_timeline);
    }
}
