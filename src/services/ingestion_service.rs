use crate::error::Result;
use crate::models::module::Module;
use crate::models::roadmap_document::{QuestionDocument, RoadmapNode};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::PgConnection;

pub const VIDEO_SUMMARY: &str = "Video tutorials and resources available. Click to watch.";
pub const DOCS_SUMMARY: &str = "Official documentation links available.";
pub const EMPTY_SUMMARY: &str = "No summary provided.";

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}

#[derive(Debug, Clone)]
pub struct PlannedModule {
    pub title: String,
    pub summary: String,
    pub resource_data: JsonValue,
    pub parent: Option<usize>,
    pub questions: Vec<PlannedQuestion>,
}

#[derive(Debug, Clone, Default)]
pub struct RoadmapPlan {
    pub modules: Vec<PlannedModule>,
}

impl RoadmapPlan {
    pub fn question_count(&self) -> usize {
        self.modules.iter().map(|m| m.questions.len()).sum()
    }
}

pub fn derive_summary(resources: &JsonValue) -> String {
    let explanation = resources
        .get("explanation")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty());

    if let Some(text) = explanation {
        return text.to_string();
    }
    if resources.get("video_queries").is_some() {
        VIDEO_SUMMARY.to_string()
    } else if resources.get("ref_links").is_some() {
        DOCS_SUMMARY.to_string()
    } else {
        EMPTY_SUMMARY.to_string()
    }
}

/// Letter A-D first, then an exact option text. Scalars are compared as
/// strings since options are stored that way.
fn resolve_correct_index(correct_answer: Option<&JsonValue>, options: &[String]) -> Option<usize> {
    let raw = match correct_answer? {
        JsonValue::String(s) => s.clone(),
        other @ (JsonValue::Number(_) | JsonValue::Bool(_)) => other.to_string(),
        _ => return None,
    };

    let mut chars = raw.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        let idx = match letter.to_ascii_uppercase() {
            'A' => Some(0),
            'B' => Some(1),
            'C' => Some(2),
            'D' => Some(3),
            _ => None,
        };
        if let Some(idx) = idx.filter(|i| *i < options.len()) {
            return Some(idx);
        }
    }

    options.iter().position(|o| *o == raw)
}

fn plan_question(node_title: &str, q: &QuestionDocument) -> Option<PlannedQuestion> {
    if q.options.is_empty() {
        tracing::warn!(
            module = node_title,
            question = %q.question,
            "Dropping generated question without options"
        );
        return None;
    }

    let correct_option_index = match resolve_correct_index(q.correct_answer.as_ref(), &q.options) {
        Some(idx) => idx,
        None => {
            tracing::warn!(
                module = node_title,
                question = %q.question,
                correct_answer = ?q.correct_answer,
                "Correct answer matched no option, defaulting to the first one"
            );
            0
        }
    };

    Some(PlannedQuestion {
        text: q.question.clone(),
        options: q.options.clone(),
        correct_option_index,
    })
}

pub fn plan_roadmap(root: &RoadmapNode) -> RoadmapPlan {
    let mut plan = RoadmapPlan::default();
    let mut stack: Vec<(&RoadmapNode, Option<usize>)> = vec![(root, None)];

    while let Some((node, parent)) = stack.pop() {
        let index = plan.modules.len();
        let questions = node
            .questions()
            .filter_map(|q| plan_question(&node.topic_name, q))
            .collect();

        plan.modules.push(PlannedModule {
            title: node.topic_name.clone(),
            summary: derive_summary(&node.resources),
            resource_data: node.resources.clone(),
            parent,
            questions,
        });

        for child in node.sub_modules.iter().rev() {
            stack.push((child, Some(index)));
        }
    }

    plan
}

/// Writes the plan parents first on the caller's connection. The caller owns
/// the transaction.
pub async fn ingest_roadmap(
    conn: &mut PgConnection,
    root: &RoadmapNode,
    parent_id: Option<i32>,
) -> Result<Module> {
    let plan = plan_roadmap(root);
    let mut ids: Vec<i32> = Vec::with_capacity(plan.modules.len());
    let mut created_root: Option<Module> = None;

    for planned in &plan.modules {
        let parent = match planned.parent {
            Some(idx) => Some(ids[idx]),
            None => parent_id,
        };

        let module = sqlx::query_as::<_, Module>(
            r#"
            INSERT INTO modules (title, summary, parent_id, resource_data)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, summary, parent_id, resource_data, created_at
            "#,
        )
        .bind(&planned.title)
        .bind(&planned.summary)
        .bind(parent)
        .bind(&planned.resource_data)
        .fetch_one(&mut *conn)
        .await?;

        for question in &planned.questions {
            sqlx::query(
                r#"
                INSERT INTO questions (module_id, text, options, correct_option_index)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(module.id)
            .bind(&question.text)
            .bind(Json(&question.options))
            .bind(question.correct_option_index as i32)
            .execute(&mut *conn)
            .await?;
        }

        ids.push(module.id);
        if created_root.is_none() {
            created_root = Some(module);
        }
    }

    tracing::info!(
        modules = plan.modules.len(),
        questions = plan.question_count(),
        "Ingested roadmap '{}'",
        root.topic_name
    );

    created_root.ok_or_else(|| crate::error::Error::Internal("Empty roadmap plan".to_string()))
}
