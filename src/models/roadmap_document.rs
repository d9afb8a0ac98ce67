use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapNode {
    pub topic_name: String,
    #[serde(default = "empty_resources")]
    pub resources: JsonValue,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_modules: Vec<RoadmapNode>,
    #[serde(default)]
    pub quiz: Option<QuizDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub question_sets: Vec<QuestionSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<QuestionDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDocument {
    pub question: String,
    #[serde(default, deserialize_with = "options_as_strings")]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<JsonValue>,
}

impl RoadmapNode {
    pub fn questions(&self) -> impl Iterator<Item = &QuestionDocument> {
        self.quiz
            .iter()
            .flat_map(|quiz| quiz.question_sets.iter())
            .flat_map(|set| set.questions.iter())
    }
}

fn empty_resources() -> JsonValue {
    JsonValue::Object(Default::default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn options_as_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<JsonValue>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|v| match v {
            JsonValue::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}
