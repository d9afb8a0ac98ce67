use axum::{
    extract::{Path, State},
    response::Json,
};
use validator::Validate;

use crate::{
    dto::roadmap_dto::{GenerateRoadmapRequest, GenerateRoadmapResponse, GoalSummary, RoadmapTreeNode},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/generate-roadmap",
    request_body = GenerateRoadmapRequest,
    responses(
        (status = 200, description = "Roadmap found or created", body = GenerateRoadmapResponse),
        (status = 400, description = "Invalid payload"),
        (status = 502, description = "Roadmap generation failed")
    )
)]
#[axum::debug_handler]
pub async fn generate_roadmap(
    State(state): State<AppState>,
    Json(mut payload): Json<GenerateRoadmapRequest>,
) -> Result<Json<GenerateRoadmapResponse>> {
    payload.skill = payload.skill.trim().to_string();
    payload.validate()?;

    let generated = state
        .roadmap_service
        .generate_roadmap(&state.ai_service, &payload.skill, payload.user_id)
        .await?;

    let message = if generated.cached {
        "Roadmap found!"
    } else {
        "Roadmap created!"
    };
    Ok(Json(GenerateRoadmapResponse {
        message: message.to_string(),
        root_id: generated.root_id,
    }))
}

#[utoipa::path(
    get,
    path = "/api/roadmap/{module_id}",
    params(
        ("module_id" = i32, Path, description = "Module ID")
    ),
    responses(
        (status = 200, description = "Nested roadmap tree", body = RoadmapTreeNode),
        (status = 404, description = "Module not found")
    )
)]
#[axum::debug_handler]
pub async fn get_roadmap(
    State(state): State<AppState>,
    Path(module_id): Path<i32>,
) -> Result<Json<RoadmapTreeNode>> {
    let tree = state.roadmap_service.get_tree(module_id).await?;
    Ok(Json(tree))
}

#[utoipa::path(
    get,
    path = "/api/my-goals/{user_id}",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Roadmaps the user is enrolled on", body = [GoalSummary]),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn my_goals(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<GoalSummary>>> {
    let goals = state.roadmap_service.list_goals(user_id).await?;
    Ok(Json(goals))
}
