use crate::dto::roadmap_dto::{GoalSummary, QuestionView, RoadmapTreeNode};
use crate::error::{Error, Result};
use crate::models::module::Module;
use crate::models::progress::STATUS_STARTED;
use crate::models::question::Question;
use crate::models::user::User;
use crate::services::ai_service::AIService;
use crate::services::ingestion_service::ingest_roadmap;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedRoadmap {
    pub root_id: i32,
    pub cached: bool,
}

#[derive(Clone)]
pub struct RoadmapService {
    pool: PgPool,
}

impl RoadmapService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the cached roadmap for `skill` or generates, ingests and
    /// commits a new one. With a known `user_id` the user is enrolled on the
    /// root either way.
    pub async fn generate_roadmap(
        &self,
        ai: &AIService,
        skill: &str,
        user_id: Option<i32>,
    ) -> Result<GeneratedRoadmap> {
        let mut conn = self.pool.acquire().await?;

        let user = match user_id {
            Some(id) => fetch_user(&mut conn, id).await?,
            None => None,
        };
        if let (Some(id), None) = (user_id, &user) {
            tracing::warn!(user_id = id, "Roadmap requested for unknown user, not enrolling");
        }
        let style = user.as_ref().map(User::style).unwrap_or_default();

        if let Some(existing) = find_existing_roadmap(&mut conn, skill).await? {
            tracing::info!(skill, root_id = existing.id, "Found cached roadmap");
            if let Some(user) = &user {
                enroll(&mut conn, user.id, existing.id).await?;
            }
            return Ok(GeneratedRoadmap {
                root_id: existing.id,
                cached: true,
            });
        }
        // Do not hold a pooled connection across the model call.
        drop(conn);

        let document = ai.generate_roadmap(skill, style).await?;

        let mut tx = self.pool.begin().await?;
        // Another request may have ingested the same skill meanwhile.
        let (root_id, cached) = match find_existing_roadmap(&mut tx, skill).await? {
            Some(existing) => (existing.id, true),
            None => (ingest_roadmap(&mut tx, &document, None).await?.id, false),
        };
        if let Some(user) = &user {
            enroll(&mut tx, user.id, root_id).await?;
        }
        tx.commit().await?;

        Ok(GeneratedRoadmap { root_id, cached })
    }

    pub async fn get_tree(&self, module_id: i32) -> Result<RoadmapTreeNode> {
        let modules = sqlx::query_as::<_, Module>(
            r#"
            WITH RECURSIVE subtree AS (
                SELECT * FROM modules WHERE id = $1
                UNION ALL
                SELECT m.* FROM modules m JOIN subtree s ON m.parent_id = s.id
            )
            SELECT id, title, summary, parent_id, resource_data, created_at
            FROM subtree
            ORDER BY id
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        if modules.is_empty() {
            return Err(Error::NotFound(format!("Module {} not found", module_id)));
        }

        let module_ids: Vec<i32> = modules.iter().map(|m| m.id).collect();
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, module_id, text, options, correct_option_index
            FROM questions
            WHERE module_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&module_ids)
        .fetch_all(&self.pool)
        .await?;

        assemble_tree(module_id, modules, questions)
            .ok_or_else(|| Error::NotFound(format!("Module {} not found", module_id)))
    }

    pub async fn list_goals(&self, user_id: i32) -> Result<Vec<GoalSummary>> {
        let mut conn = self.pool.acquire().await?;
        if fetch_user(&mut conn, user_id).await?.is_none() {
            return Err(Error::NotFound(format!("User {} not found", user_id)));
        }

        let goals = sqlx::query_as::<_, GoalSummary>(
            r#"
            SELECT m.id, m.title, p.status, u.xp, u.level
            FROM user_module_progress p
            JOIN modules m ON m.id = p.module_id
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1 AND m.parent_id IS NULL
            ORDER BY p.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(goals)
    }
}

pub async fn find_existing_roadmap(conn: &mut PgConnection, skill: &str) -> Result<Option<Module>> {
    let module = sqlx::query_as::<_, Module>(
        r#"
        SELECT id, title, summary, parent_id, resource_data, created_at
        FROM modules
        WHERE LOWER(title) = LOWER($1) AND parent_id IS NULL
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(skill)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(module)
}

pub async fn enroll(conn: &mut PgConnection, user_id: i32, module_id: i32) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_module_progress (user_id, module_id, status)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, module_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(module_id)
    .bind(STATUS_STARTED)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn fetch_user(conn: &mut PgConnection, user_id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

/// Builds the nested response for `root_id` from flat rows. Rows outside the
/// root's subtree are ignored.
pub fn assemble_tree(
    root_id: i32,
    modules: Vec<Module>,
    questions: Vec<Question>,
) -> Option<RoadmapTreeNode> {
    let mut questions_by_module: HashMap<i32, Vec<QuestionView>> = HashMap::new();
    for q in questions {
        questions_by_module
            .entry(q.module_id)
            .or_default()
            .push(QuestionView {
                id: q.id,
                text: q.text,
                options: q.options.0,
            });
    }

    let mut children: HashMap<i32, Vec<i32>> = HashMap::new();
    let mut by_id: HashMap<i32, Module> = HashMap::new();
    for m in modules {
        if let Some(parent) = m.parent_id {
            children.entry(parent).or_default().push(m.id);
        }
        by_id.insert(m.id, m);
    }
    for ids in children.values_mut() {
        ids.sort_unstable();
    }

    build_node(root_id, &mut by_id, &children, &mut questions_by_module)
}

fn build_node(
    id: i32,
    by_id: &mut HashMap<i32, Module>,
    children: &HashMap<i32, Vec<i32>>,
    questions: &mut HashMap<i32, Vec<QuestionView>>,
) -> Option<RoadmapTreeNode> {
    let module = by_id.remove(&id)?;
    let sub_modules = children
        .get(&id)
        .map(|ids| {
            ids.iter()
                .filter_map(|child| build_node(*child, by_id, children, questions))
                .collect()
        })
        .unwrap_or_default();

    Some(RoadmapTreeNode {
        id: module.id,
        title: module.title,
        summary: module.summary,
        resource_data: module.resource_data,
        questions: questions.remove(&id).unwrap_or_default(),
        sub_modules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use sqlx::types::Json;

    fn module(id: i32, title: &str, parent_id: Option<i32>) -> Module {
        Module {
            id,
            title: title.to_string(),
            summary: format!("{} summary", title),
            parent_id,
            resource_data: json!({ "explanation": title }),
            created_at: Utc::now(),
        }
    }

    fn question(id: i32, module_id: i32) -> Question {
        Question {
            id,
            module_id,
            text: format!("q{}", id),
            options: Json(vec!["yes".into(), "no".into()]),
            correct_option_index: 1,
        }
    }

    #[test]
    fn nests_modules_and_questions() {
        let modules = vec![
            module(1, "Rust", None),
            module(4, "Traits", Some(1)),
            module(2, "Ownership", Some(1)),
            module(3, "Borrowing", Some(2)),
        ];
        let questions = vec![question(10, 2), question(11, 3), question(12, 3)];

        let tree = assemble_tree(1, modules, questions).unwrap();
        assert_eq!(tree.title, "Rust");
        assert!(tree.questions.is_empty());
        let titles: Vec<&str> = tree.sub_modules.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Ownership", "Traits"]);

        let ownership = &tree.sub_modules[0];
        assert_eq!(ownership.questions.len(), 1);
        assert_eq!(ownership.sub_modules[0].questions.len(), 2);
        assert_eq!(ownership.sub_modules[0].questions[1].options, vec!["yes", "no"]);
    }

    #[test]
    fn subtree_request_starts_below_the_root() {
        let modules = vec![
            module(1, "Rust", None),
            module(2, "Ownership", Some(1)),
            module(3, "Borrowing", Some(2)),
        ];
        let tree = assemble_tree(2, modules, vec![]).unwrap();
        assert_eq!(tree.title, "Ownership");
        assert_eq!(tree.sub_modules.len(), 1);
    }

    #[test]
    fn missing_root_yields_none() {
        assert!(assemble_tree(9, vec![module(1, "Rust", None)], vec![]).is_none());
    }

    #[test]
    fn serialized_tree_hides_correct_answers() {
        let tree = assemble_tree(1, vec![module(1, "Rust", None)], vec![question(5, 1)]).unwrap();
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["questions"][0], json!({ "id": 5, "text": "q5", "options": ["yes", "no"] }));
        assert!(value["questions"][0].get("correct_option_index").is_none());
    }
}
