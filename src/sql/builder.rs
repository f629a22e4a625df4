//! Builds the filtered SELECT and COUNT statements for items.

use crate::filter::ItemFilter;
use crate::pagination::Window;
use crate::sql::PgBindValue;

pub const ITEM_COLUMNS: &str =
    "id, sku, name, category, tags, stock_status, available_stock, created_at";

/// LIMIT and OFFSET are bigint in Postgres.
const BIGINT_MAX: u64 = i64::MAX as u64;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// WHERE clause for `filter`, with its parameters pushed onto `q`. Empty when nothing is filtered.
fn where_clause(q: &mut QueryBuf, filter: &ItemFilter) -> String {
    let mut parts = Vec::new();
    if let Some(category) = &filter.category {
        let n = q.push_param(PgBindValue::Text(category.clone()));
        parts.push(format!("category = ${}", n));
    }
    if let Some(status) = &filter.stock_status {
        let n = q.push_param(PgBindValue::Text(status.clone()));
        parts.push(format!("stock_status = ${}", n));
    }
    if let Some((from, to)) = filter.created_between {
        let a = q.push_param(PgBindValue::Timestamp(from));
        let b = q.push_param(PgBindValue::Timestamp(to));
        parts.push(format!("created_at BETWEEN ${} AND ${}", a, b));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

pub fn select_items(filter: &ItemFilter, window: Window) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, filter);
    q.sql = format!(
        "SELECT {} FROM items{} ORDER BY id LIMIT {} OFFSET {}",
        ITEM_COLUMNS,
        where_sql,
        window.limit.min(BIGINT_MAX),
        window.offset.min(BIGINT_MAX)
    );
    q
}

pub fn count_items(filter: &ItemFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, filter);
    q.sql = format!("SELECT COUNT(*) FROM items{}", where_sql);
    q
}
