//! Probes and metadata: health, readiness, version, OpenAPI document and its viewers.

use crate::error::AppError;
use crate::openapi;
use crate::state::{AppState, HealthProbe};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    database: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn ready(
    State(probe): State<Arc<dyn HealthProbe>>,
) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    if let Err(e) = probe.ping().await {
        tracing::warn!(error = %e, "readiness check failed");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                database: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        database: "ok",
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn swagger_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::document())
}

async fn swagger_yaml() -> Result<impl IntoResponse, AppError> {
    let body = openapi::yaml()?;
    Ok(([(header::CONTENT_TYPE, "application/yaml")], body))
}

async fn swagger_ui() -> Html<&'static str> {
    Html(openapi::SWAGGER_UI_PAGE)
}

async fn redoc() -> Html<&'static str> {
    Html(openapi::REDOC_PAGE)
}

/// GET /health, /ready, /version, /swagger.json, /swagger.yaml, /swagger/, /redoc/. No token required.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .route("/swagger.json", get(swagger_json))
        .route("/swagger.yaml", get(swagger_yaml))
        .route("/swagger/", get(swagger_ui))
        .route("/redoc/", get(redoc))
        .with_state(state.probe)
}
