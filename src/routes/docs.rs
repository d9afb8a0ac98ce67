use axum::response::Json;
use utoipa::OpenApi;

use crate::dto::{
    quiz_dto::{AnswerSubmission, QuizResult, SubmitQuizRequest},
    roadmap_dto::{
        GenerateRoadmapRequest, GenerateRoadmapResponse, GoalSummary, QuestionView,
        RoadmapTreeNode,
    },
    user_dto::{
        LoginRequest, LoginResponse, MessageResponse, SettingsResponse, SignupRequest,
        SignupResponse, UpdateSettingsRequest,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::roadmap::generate_roadmap,
        crate::routes::roadmap::get_roadmap,
        crate::routes::roadmap::my_goals,
        crate::routes::quiz::submit_quiz,
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::settings::get_settings,
        crate::routes::settings::update_settings,
    ),
    components(schemas(
        GenerateRoadmapRequest,
        GenerateRoadmapResponse,
        RoadmapTreeNode,
        QuestionView,
        GoalSummary,
        SubmitQuizRequest,
        AnswerSubmission,
        QuizResult,
        SignupRequest,
        SignupResponse,
        LoginRequest,
        LoginResponse,
        SettingsResponse,
        UpdateSettingsRequest,
        MessageResponse,
    )),
    tags((name = "roadmap", description = "Learning roadmap API"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
