use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct GenerateRoadmapRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Skill must be 1-255 characters"))]
    pub skill: String,
    #[serde(default, deserialize_with = "crate::utils::ids::deserialize_optional_id")]
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateRoadmapResponse {
    pub message: String,
    pub root_id: i32,
}

/// Question as shown to learners; the correct index stays server side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionView {
    pub id: i32,
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoadmapTreeNode {
    pub id: i32,
    pub title: String,
    pub summary: String,
    #[schema(value_type = Object)]
    pub resource_data: JsonValue,
    pub questions: Vec<QuestionView>,
    pub sub_modules: Vec<RoadmapTreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct GoalSummary {
    pub id: i32,
    pub title: String,
    pub status: String,
    pub xp: i32,
    pub level: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_skill_fails_validation_instead_of_parsing() {
        let req: GenerateRoadmapRequest = serde_json::from_value(json!({ "user_id": "3" })).unwrap();
        assert_eq!(req.skill, "");
        assert_eq!(req.user_id, Some(3));
        assert!(req.validate().is_err());
    }
}
