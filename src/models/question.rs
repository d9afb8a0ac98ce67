use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub module_id: i32,
    pub text: String,
    pub options: Json<Vec<String>>,
    pub correct_option_index: i32,
}

impl Question {
    pub fn is_correct(&self, selected_index: i32) -> bool {
        self.correct_option_index == selected_index
    }
}
