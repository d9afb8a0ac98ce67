use crate::dto::quiz_dto::{AnswerSubmission, QuizResult};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::quiz_attempt::UserQuizAttempt;
use crate::models::user::User;
use crate::services::grading_service::{next_level, QuizTally};
use crate::utils::time::now;
use sqlx::{PgConnection, PgPool};

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn submit(&self, user_id: i32, answers: &[AnswerSubmission]) -> Result<QuizResult> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1 FOR UPDATE"#)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))?;

        let mut tally = QuizTally::new(answers.len());
        for answer in answers {
            let Some(question) = fetch_question(&mut tx, answer.question_id).await? else {
                tracing::debug!(question_id = answer.question_id, "Skipping unknown question");
                continue;
            };

            let solved_before = has_solved(&mut tx, user_id, question.id).await?;
            let is_correct = tally.record(&question, answer.selected_index, solved_before);
            let attempt = record_attempt(&mut tx, user_id, question.id, is_correct).await?;
            tracing::debug!(
                attempt_id = attempt.id,
                question_id = attempt.question_id,
                is_correct,
                "Recorded quiz attempt"
            );
        }

        let mut level = user.level;
        if tally.xp_earned() > 0 {
            let xp = user.xp + tally.xp_earned();
            level = next_level(user.level, xp);
            sqlx::query(r#"UPDATE users SET xp = $1, level = $2 WHERE id = $3"#)
                .bind(xp)
                .bind(level)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            if level > user.level {
                tracing::info!(user_id, level, "User levelled up");
            }
        }

        let score = tally.score_percent();
        for module_id in tally.touched_modules() {
            upsert_quiz_progress(&mut tx, user_id, module_id, score, tally.needs_revision(module_id))
                .await?;
        }

        tx.commit().await?;

        let result = tally.into_result(level);
        tracing::info!(
            user_id,
            answers = answers.len(),
            score = result.score_percent,
            xp = result.xp_earned,
            failed_modules = result.failed_module_ids.len(),
            "Quiz graded"
        );
        Ok(result)
    }
}

async fn fetch_question(conn: &mut PgConnection, question_id: i32) -> Result<Option<Question>> {
    let question = sqlx::query_as::<_, Question>(
        r#"SELECT id, module_id, text, options, correct_option_index FROM questions WHERE id = $1"#,
    )
    .bind(question_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(question)
}

async fn has_solved(conn: &mut PgConnection, user_id: i32, question_id: i32) -> Result<bool> {
    let solved: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM user_quiz_attempts
            WHERE user_id = $1 AND question_id = $2 AND is_correct
        )
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(solved)
}

async fn record_attempt(
    conn: &mut PgConnection,
    user_id: i32,
    question_id: i32,
    is_correct: bool,
) -> Result<UserQuizAttempt> {
    let attempt = sqlx::query_as::<_, UserQuizAttempt>(
        r#"
        INSERT INTO user_quiz_attempts (user_id, question_id, is_correct, timestamp)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, question_id, is_correct, timestamp
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .bind(is_correct)
    .bind(now())
    .fetch_one(&mut *conn)
    .await?;
    Ok(attempt)
}

/// Every touched module gets the whole submission's score, and its revision
/// flag is set or cleared from this submission alone.
async fn upsert_quiz_progress(
    conn: &mut PgConnection,
    user_id: i32,
    module_id: i32,
    score: f64,
    needs_revision: bool,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_module_progress (user_id, module_id, last_quiz_score, needs_revision)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, module_id) DO UPDATE
        SET last_quiz_score = EXCLUDED.last_quiz_score,
            needs_revision = EXCLUDED.needs_revision
        "#,
    )
    .bind(user_id)
    .bind(module_id)
    .bind(score)
    .bind(needs_revision)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
