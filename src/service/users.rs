use super::{unique_violation, PgStore};
use crate::auth::{generate_token, NewAccount, UserRepository};
use crate::error::AppError;
use crate::model::User;
use async_trait::async_trait;

const USER_COLUMNS: &str = "id, username, email, password_hash, date_joined";

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, account: NewAccount) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&account.username)
            .bind(&account.email)
            .bind(&account.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "username", "A user with that username already exists."))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn token_for(&self, user_id: i64) -> Result<String, AppError> {
        sqlx::query(
            "INSERT INTO auth_tokens (key, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(generate_token())
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        let (key,): (String,) = sqlx::query_as("SELECT key FROM auth_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(key)
    }

    async fn user_for_token(&self, key: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.username, u.email, u.password_hash, u.date_joined \
             FROM users u JOIN auth_tokens t ON t.user_id = u.id WHERE t.key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
