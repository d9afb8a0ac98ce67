use axum::{extract::State, response::Json};

use crate::{
    dto::quiz_dto::{QuizResult, SubmitQuizRequest},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/submit-quiz",
    request_body = SubmitQuizRequest,
    responses(
        (status = 200, description = "Submission graded", body = QuizResult),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<Json<QuizResult>> {
    let result = state
        .quiz_service
        .submit(payload.user_id, &payload.answers)
        .await?;
    Ok(Json(result))
}
