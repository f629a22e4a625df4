//! Resource descriptors served by the generic endpoint, and the storage seam behind them.
//! A resource type pairs a record with its validation and list filter; the concrete
//! `Repository` is picked when routes are registered.

use crate::error::AppError;
use crate::filter::ItemFilter;
use crate::model::{Category, CategoryInput, Item, ItemInput};
use crate::pagination::{Listing, Window};
use crate::validation::FieldErrors;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub trait Resource: Send + Sync + 'static {
    type Record: Serialize + Send + Sync + 'static;
    type Input: Send + 'static;
    type Filter: Send + Sync + 'static;

    /// Short name used in logs.
    const NAME: &'static str;

    fn validate(body: &Value) -> Result<Self::Input, FieldErrors>;

    fn filter(query: &HashMap<String, String>) -> Result<Self::Filter, FieldErrors>;
}

/// Persistence for one resource type. Lookups by key return `None` when nothing matches.
/// A resource registered without member routes never receives a key, so it keeps the
/// not-found defaults of the keyed operations.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    /// Records matching `filter`, ordered by id, restricted to `window`.
    async fn list(&self, filter: &R::Filter, window: Window) -> Result<Listing<R::Record>, AppError>;

    async fn create(&self, input: R::Input) -> Result<R::Record, AppError>;

    async fn find(&self, _key: &str) -> Result<Option<R::Record>, AppError> {
        Ok(None)
    }

    /// Full replacement of the record under `key`; `None` if it no longer exists.
    async fn replace(&self, _key: &str, _input: R::Input) -> Result<Option<R::Record>, AppError> {
        Ok(None)
    }

    /// Returns whether a record was removed.
    async fn delete(&self, _key: &str) -> Result<bool, AppError> {
        Ok(false)
    }
}

/// Items, keyed by sku.
pub struct Items;

impl Resource for Items {
    type Record = Item;
    type Input = ItemInput;
    type Filter = ItemFilter;

    const NAME: &'static str = "item";

    fn validate(body: &Value) -> Result<ItemInput, FieldErrors> {
        ItemInput::from_json(body)
    }

    fn filter(query: &HashMap<String, String>) -> Result<ItemFilter, FieldErrors> {
        ItemFilter::from_query(query)
    }
}

/// Categories. Collection only: no list filters and no member routes.
pub struct Categories;

impl Resource for Categories {
    type Record = Category;
    type Input = CategoryInput;
    type Filter = ();

    const NAME: &'static str = "category";

    fn validate(body: &Value) -> Result<CategoryInput, FieldErrors> {
        CategoryInput::from_json(body)
    }

    fn filter(_query: &HashMap<String, String>) -> Result<(), FieldErrors> {
        Ok(())
    }
}
