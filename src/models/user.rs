use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub xp: i32,
    pub level: i32,
    pub learning_style: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Stored style, falling back to text for values written outside the API.
    pub fn style(&self) -> LearningStyle {
        self.learning_style.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStyle {
    #[default]
    Text,
    Video,
    OfficialDocs,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 3] = [
        LearningStyle::Text,
        LearningStyle::Video,
        LearningStyle::OfficialDocs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Text => "text",
            LearningStyle::Video => "video",
            LearningStyle::OfficialDocs => "official_docs",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LearningStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| format!("Invalid style option: {}", s))
    }
}

/// Level reached with `xp` points: one level per 100 XP, starting at 1.
pub fn level_for_xp(xp: i32) -> i32 {
    1 + xp.max(0) / 100
}
