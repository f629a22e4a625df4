//! Extract the authenticated caller placed on the request by `auth::require_token`.

use crate::auth::AuthUser;
use crate::error::{AppError, AuthFailure};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Authenticated caller. Rejects with 401 when the route is not behind the token check.
#[derive(Clone, Debug)]
pub struct Caller(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(Caller)
            .ok_or(AppError::Unauthorized(AuthFailure::MissingCredentials))
    }
}
