use super::{unique_violation, PgStore};
use crate::error::AppError;
use crate::filter::ItemFilter;
use crate::model::{Item, ItemInput};
use crate::pagination::{Listing, Window};
use crate::resource::{Items, Repository};
use crate::sql::{bind_all, count_items, select_items, ITEM_COLUMNS};
use async_trait::async_trait;

const SKU_TAKEN: &str = "item with this sku already exists.";

#[async_trait]
impl Repository<Items> for PgStore {
    async fn find(&self, sku: &str) -> Result<Option<Item>, AppError> {
        let sql = format!("SELECT {} FROM items WHERE sku = $1", ITEM_COLUMNS);
        tracing::debug!(sql = %sql, sku = %sku, "query");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn list(&self, filter: &ItemFilter, window: Window) -> Result<Listing<Item>, AppError> {
        let count_q = count_items(filter);
        tracing::debug!(sql = %count_q.sql, params = ?count_q.params, "query");
        let (count,): (i64,) = bind_all(sqlx::query_as(&count_q.sql), &count_q.params)
            .fetch_one(&self.pool)
            .await?;

        let q = select_items(filter, window);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let records = bind_all(sqlx::query_as::<_, Item>(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(Listing {
            count: u64::try_from(count).unwrap_or_default(),
            records,
        })
    }

    async fn create(&self, input: ItemInput) -> Result<Item, AppError> {
        let sql = format!(
            "INSERT INTO items (sku, name, category, tags, stock_status, available_stock) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ITEM_COLUMNS
        );
        tracing::debug!(sql = %sql, sku = %input.sku, "query");
        sqlx::query_as::<_, Item>(&sql)
            .bind(&input.sku)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.stock_status.as_str())
            .bind(input.available_stock)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "sku", SKU_TAKEN))
    }

    async fn replace(&self, sku: &str, input: ItemInput) -> Result<Option<Item>, AppError> {
        let sql = format!(
            "UPDATE items SET sku = $1, name = $2, category = $3, tags = $4, \
             stock_status = $5, available_stock = $6 WHERE sku = $7 RETURNING {}",
            ITEM_COLUMNS
        );
        tracing::debug!(sql = %sql, sku = %sku, "query");
        sqlx::query_as::<_, Item>(&sql)
            .bind(&input.sku)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.stock_status.as_str())
            .bind(input.available_stock)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "sku", SKU_TAKEN))
    }

    async fn delete(&self, sku: &str) -> Result<bool, AppError> {
        tracing::debug!(sku = %sku, "delete item");
        let result = sqlx::query("DELETE FROM items WHERE sku = $1")
            .bind(sku)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
