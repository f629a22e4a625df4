use super::PgStore;
use crate::error::AppError;
use crate::model::{Category, CategoryInput};
use crate::pagination::{Listing, Window};
use crate::resource::{Categories, Repository};
use async_trait::async_trait;

#[async_trait]
impl Repository<Categories> for PgStore {
    async fn list(&self, _filter: &(), window: Window) -> Result<Listing<Category>, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;
        let records = sqlx::query_as::<_, Category>(
            "SELECT id, name FROM categories ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(window.offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;
        Ok(Listing {
            count: u64::try_from(count).unwrap_or_default(),
            records,
        })
    }

    async fn create(&self, input: CategoryInput) -> Result<Category, AppError> {
        let row = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
