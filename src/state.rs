//! Shared application state, built once at startup and handed to the routers.

use crate::auth::UserRepository;
use crate::error::AppError;
use crate::pagination::PaginationSettings;
use crate::resource::{Categories, Items, Repository, Resource};
use crate::service::PgStore;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Backend liveness check used by `/ready`.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct AppState {
    pub items: Arc<dyn Repository<Items>>,
    pub categories: Arc<dyn Repository<Categories>>,
    pub users: Arc<dyn UserRepository>,
    pub probe: Arc<dyn HealthProbe>,
    pub pagination: Arc<PaginationSettings>,
}

impl AppState {
    /// Every repository backed by the same Postgres pool.
    pub fn postgres(pool: PgPool, pagination: PaginationSettings) -> Self {
        let store = Arc::new(PgStore::new(pool));
        AppState {
            items: store.clone(),
            categories: store.clone(),
            users: store.clone(),
            probe: store,
            pagination: Arc::new(pagination),
        }
    }
}

/// State of one resource's routes: its repository and the paging rules.
pub struct ResourceState<R: Resource> {
    pub repo: Arc<dyn Repository<R>>,
    pub pagination: Arc<PaginationSettings>,
}

impl<R: Resource> ResourceState<R> {
    pub fn new(repo: Arc<dyn Repository<R>>, pagination: Arc<PaginationSettings>) -> Self {
        ResourceState { repo, pagination }
    }
}

impl<R: Resource> Clone for ResourceState<R> {
    fn clone(&self) -> Self {
        ResourceState {
            repo: self.repo.clone(),
            pagination: self.pagination.clone(),
        }
    }
}
