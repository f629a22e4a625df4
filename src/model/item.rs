//! Inventory item record, its stock status, and body validation.

use crate::validation::{FieldErrors, Fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

pub const SKU_MAX_LENGTH: usize = 50;
pub const NAME_MAX_LENGTH: usize = 255;
pub const CATEGORY_MAX_LENGTH: usize = 100;
pub const TAGS_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown stock status: {0}")]
pub struct ParseStockStatusError(pub String);

impl FromStr for StockStatus {
    type Err = ParseStockStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_stock" => Ok(StockStatus::InStock),
            "out_of_stock" => Ok(StockStatus::OutOfStock),
            other => Err(ParseStockStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for StockStatus {
    type Error = ParseStockStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Stored item as returned by every item endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Item {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub category: String,
    /// Comma-separated free text.
    pub tags: String,
    #[sqlx(try_from = "String")]
    pub stock_status: StockStatus,
    pub available_stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Writable item fields. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ItemInput {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub tags: String,
    pub stock_status: StockStatus,
    pub available_stock: i32,
}

impl ItemInput {
    /// Validate a full item body. Read-only fields in the body are ignored.
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(body)?;
        let input = ItemInput {
            sku: fields.string("sku", SKU_MAX_LENGTH),
            name: fields.string("name", NAME_MAX_LENGTH),
            category: fields.string("category", CATEGORY_MAX_LENGTH),
            tags: fields.string("tags", TAGS_MAX_LENGTH),
            stock_status: fields.choice("stock_status"),
            available_stock: i32::try_from(fields.integer(
                "available_stock",
                0,
                i64::from(i32::MAX),
            ))
            .unwrap_or_default(),
        };
        fields.finish(input)
    }

    /// Materialize as a record; used by stores that do not assign ids themselves.
    pub fn into_item(self, id: i64, created_at: DateTime<Utc>) -> Item {
        Item {
            id,
            sku: self.sku,
            name: self.name,
            category: self.category,
            tags: self.tags,
            stock_status: self.stock_status,
            available_stock: self.available_stock,
            created_at,
        }
    }
}
