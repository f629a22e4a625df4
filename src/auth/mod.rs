//! Accounts, token issuance, and the token check guarding protected routes.

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{generate_token, parse_authorization};

use crate::error::AppError;
use crate::model::User;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Account fields ready to persist; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with a `username` field error when the name is taken.
    async fn create(&self, account: NewAccount) -> Result<User, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// The user's token, created on first request.
    async fn token_for(&self, user_id: i64) -> Result<String, AppError>;

    async fn user_for_token(&self, key: &str) -> Result<Option<User>, AppError>;
}

/// Caller identity attached to requests that passed the token check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

/// Look the user up by name and check the password.
pub async fn authenticate(
    users: &dyn UserRepository,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let user = users.find_by_username(username).await?;
    Ok(user.filter(|u| verify_password(password, &u.password_hash)))
}

/// Rejects the request with 401 unless it carries a known token. Runs before the handler.
pub async fn require_token(
    State(users): State<Arc<dyn UserRepository>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = parse_authorization(req.headers().get(header::AUTHORIZATION))?;
    let user = users
        .user_for_token(&key)
        .await?
        .ok_or(crate::error::AuthFailure::InvalidToken)?;
    tracing::debug!(user = %user.username, "authenticated");
    req.extensions_mut().insert(AuthUser {
        id: user.id,
        username: user.username,
    });
    Ok(next.run(req).await)
}
