use crate::dto::user_dto::SignupRequest;
use crate::error::{Error, Result};
use crate::models::user::{LearningStyle, User};
use crate::utils::crypto::{hash_password, verify_password};
use sqlx::PgPool;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn signup(&self, payload: &SignupRequest) -> Result<User> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 OR username = $2)"#,
        )
        .bind(&payload.email)
        .bind(&payload.username)
        .fetch_one(&self.pool)
        .await?;
        if exists {
            return Err(Error::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(&payload.password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, learning_style)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(password_hash)
        .bind(LearningStyle::default().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict("User already exists".to_string()),
            other => other,
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    /// Fails with the same message whether the username or the password is
    /// wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE username = $1"#)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        match user {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => {
                tracing::info!(username, "Failed login attempt");
                Err(Error::Unauthorized(INVALID_CREDENTIALS.to_string()))
            }
        }
    }

    pub async fn get_user(&self, user_id: i32) -> Result<User> {
        sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }

    pub async fn update_learning_style(&self, user_id: i32, style: LearningStyle) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"UPDATE users SET learning_style = $1 WHERE id = $2 RETURNING *"#,
        )
        .bind(style.as_str())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }
}
