use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{
    dto::user_dto::{MessageResponse, SettingsResponse, UpdateSettingsRequest},
    error::{Error, Result},
    models::user::LearningStyle,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/user/settings/{user_id}",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Current learning style", body = SettingsResponse),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<SettingsResponse>> {
    let user = state.user_service.get_user(user_id).await?;
    Ok(Json(SettingsResponse {
        learning_style: user.style().to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/update-settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = MessageResponse),
        (status = 400, description = "Missing field or invalid style"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Json<MessageResponse>> {
    let (Some(user_id), Some(style)) = (payload.user_id, payload.learning_style) else {
        return Err(Error::BadRequest(
            "Missing user_id or learning_style".to_string(),
        ));
    };
    let style: LearningStyle = style
        .parse()
        .map_err(|_| Error::BadRequest("Invalid style option".to_string()))?;

    state.user_service.update_learning_style(user_id, style).await?;
    tracing::info!(user_id, style = %style, "Learning style updated");

    Ok(Json(MessageResponse {
        message: "Settings updated".to_string(),
    }))
}
