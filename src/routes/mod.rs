//! Router assembly: public account routes, token-guarded resource routes, and probes.

mod common;

pub use common::common_routes;

use crate::auth::require_token;
use crate::handlers::{account, resource};
use crate::resource::{Categories, Items, Repository, Resource};
use crate::state::{AppState, ResourceState};
use axum::{
    middleware::from_fn_with_state,
    routing::{any, post},
    Router,
};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Collection route only; `PUT`/`DELETE` without a key answer 404.
fn collection_routes<R: Resource>(
    path: &str,
    repo: Arc<dyn Repository<R>>,
    state: &AppState,
) -> Router {
    Router::new()
        .route(path, any(resource::collection::<R>))
        .with_state(ResourceState::new(repo, state.pagination.clone()))
}

/// Collection plus `/:key/` member routes.
fn keyed_routes<R: Resource>(
    path: &str,
    repo: Arc<dyn Repository<R>>,
    state: &AppState,
) -> Router {
    let member = format!("{}:key/", path);
    Router::new()
        .route(path, any(resource::collection::<R>))
        .route(&member, any(resource::member::<R>))
        .with_state(ResourceState::new(repo, state.pagination.clone()))
}

/// Routes behind the token check. Every method is routed so the 401 comes before anything else.
pub fn resource_routes(state: &AppState) -> Router {
    Router::new()
        .merge(keyed_routes::<Items>("/items/", state.items.clone(), state))
        .merge(collection_routes::<Categories>(
            "/categories/",
            state.categories.clone(),
            state,
        ))
        .route_layer(from_fn_with_state(state.users.clone(), require_token))
}

/// `POST /create_user/` and `POST /api-token-auth/`.
pub fn account_routes(state: &AppState) -> Router {
    Router::new()
        .route("/create_user/", post(account::create_user))
        .route("/api-token-auth/", post(account::obtain_token))
        .with_state(state.users.clone())
}

/// The whole service.
pub fn app(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .merge(account_routes(&state))
        .merge(resource_routes(&state))
        .merge(common_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
