use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be 1-50 characters"))]
    pub username: String,
    #[validate(
        email(message = "Email address is invalid"),
        length(max = 120, message = "Email must be at most 120 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i32,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub learning_style: String,
}

/// Both fields are optional at the wire level so a missing one is reported
/// as a 400 with a message rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    #[serde(default, deserialize_with = "crate::utils::ids::deserialize_optional_id")]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub learning_style: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
