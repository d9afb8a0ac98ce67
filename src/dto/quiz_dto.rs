use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerSubmission {
    pub question_id: i32,
    pub selected_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitQuizRequest {
    #[serde(deserialize_with = "crate::utils::ids::deserialize_id")]
    pub user_id: i32,
    #[serde(default)]
    pub answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuizResult {
    pub score_percent: f64,
    pub failed_module_ids: Vec<i32>,
    pub xp_earned: i32,
    pub current_level: i32,
}
