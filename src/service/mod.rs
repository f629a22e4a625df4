//! Postgres-backed repositories. One `PgStore` serves every resource and the user accounts.

mod categories;
mod items;
mod users;

use crate::error::AppError;
use crate::state::HealthProbe;
use crate::validation::FieldErrors;
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl HealthProbe for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map a unique-constraint violation to a field error; other errors pass through.
fn unique_violation(err: sqlx::Error, field: &str, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Validation(FieldErrors::single(field, message))
        }
        _ => AppError::Db(err),
    }
}
