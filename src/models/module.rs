use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Module {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub parent_id: Option<i32>,
    pub resource_data: JsonValue,
    pub created_at: DateTime<Utc>,
}

