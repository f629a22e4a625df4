//! Generic resource endpoint: one handler pair serves every resource type,
//! branching on the HTTP method and on whether an identifier is in the path.

use crate::error::AppError;
use crate::extractors::Caller;
use crate::handlers::parse_body;
use crate::pagination::{request_url, Page, Window};
use crate::resource::Resource;
use crate::response::{created, no_content, ok};
use crate::state::ResourceState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, Uri},
    response::Response,
};
use std::collections::HashMap;

/// Everything about the request the dispatcher needs besides method and key.
pub struct ResourceRequest {
    pub uri: Uri,
    pub headers: HeaderMap,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

/// `/items/`, `/categories/`
pub async fn collection<R: Resource>(
    State(state): State<ResourceState<R>>,
    Caller(caller): Caller,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, AppError> {
    tracing::debug!(resource = R::NAME, %method, user = %caller.username, "collection request");
    let request = ResourceRequest { uri, headers, query, body };
    dispatch(&state, method, None, request).await
}

/// `/items/:sku/`
pub async fn member<R: Resource>(
    State(state): State<ResourceState<R>>,
    Caller(caller): Caller,
    Path(key): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, AppError> {
    tracing::debug!(resource = R::NAME, %method, key = %key, user = %caller.username, "member request");
    let request = ResourceRequest { uri, headers, query, body };
    dispatch(&state, method, Some(key), request).await
}

pub async fn dispatch<R: Resource>(
    state: &ResourceState<R>,
    method: Method,
    key: Option<String>,
    request: ResourceRequest,
) -> Result<Response, AppError> {
    match method {
        Method::GET => match key {
            Some(key) => retrieve(state, &key).await,
            None => list(state, &request).await,
        },
        Method::POST => create(state, &request).await,
        Method::PUT => {
            let key = key.ok_or_else(AppError::item_not_found)?;
            replace(state, &key, &request).await
        }
        Method::DELETE => {
            let key = key.ok_or_else(AppError::item_not_found)?;
            remove(state, &key).await
        }
        other => Err(AppError::MethodNotAllowed(other.to_string())),
    }
}

async fn retrieve<R: Resource>(state: &ResourceState<R>, key: &str) -> Result<Response, AppError> {
    let record = state
        .repo
        .find(key)
        .await?
        .ok_or_else(AppError::item_not_found)?;
    Ok(ok(record))
}

async fn list<R: Resource>(
    state: &ResourceState<R>,
    request: &ResourceRequest,
) -> Result<Response, AppError> {
    let filter = R::filter(&request.query)?;
    let window = Window::from_query(&request.query, &state.pagination);
    let listing = state.repo.list(&filter, window).await?;
    let url = request_url(&state.pagination, &request.headers, &request.uri);
    Ok(ok(Page::new(listing, window, url.as_ref())))
}

async fn create<R: Resource>(
    state: &ResourceState<R>,
    request: &ResourceRequest,
) -> Result<Response, AppError> {
    let body = parse_body(&request.body)?;
    let input = R::validate(&body)?;
    let record = state.repo.create(input).await?;
    tracing::info!(resource = R::NAME, "created");
    Ok(created(record))
}

async fn replace<R: Resource>(
    state: &ResourceState<R>,
    key: &str,
    request: &ResourceRequest,
) -> Result<Response, AppError> {
    if state.repo.find(key).await?.is_none() {
        return Err(AppError::item_not_found());
    }
    let body = parse_body(&request.body)?;
    let input = R::validate(&body)?;
    let record = state
        .repo
        .replace(key, input)
        .await?
        .ok_or_else(AppError::item_not_found)?;
    tracing::info!(resource = R::NAME, key = %key, "updated");
    Ok(ok(record))
}

async fn remove<R: Resource>(state: &ResourceState<R>, key: &str) -> Result<Response, AppError> {
    if !state.repo.delete(key).await? {
        return Err(AppError::item_not_found());
    }
    tracing::info!(resource = R::NAME, key = %key, "deleted");
    Ok(no_content())
}
