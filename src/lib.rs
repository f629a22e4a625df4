//! Stockroom: token-authenticated inventory REST API over PostgreSQL.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod filter;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod pagination;
pub mod resource;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod validation;

pub use auth::{AuthUser, NewAccount, UserRepository};
pub use config::Settings;
pub use error::{AppError, AuthFailure, ConfigError};
pub use pagination::{Listing, PaginationSettings, Window};
pub use resource::{Categories, Items, Repository, Resource};
pub use routes::app;
pub use service::PgStore;
pub use state::{AppState, HealthProbe};
pub use store::{ensure_database_exists, ensure_tables};
