use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const STATUS_STARTED: &str = "started";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserModuleProgress {
    pub id: i32,
    pub user_id: i32,
    pub module_id: i32,
    pub status: String,
    pub is_read: bool,
    pub needs_revision: bool,
    pub last_quiz_score: f64,
}
