use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserQuizAttempt {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}
