//! Values bound to a built query.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PgBindValue {
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Bind `params` in order, matching the `$n` placeholders of the built SQL.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [PgBindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            PgBindValue::Text(s) => query.bind(s.as_str()),
            PgBindValue::Timestamp(t) => query.bind(*t),
        };
    }
    query
}
