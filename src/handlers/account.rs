//! Account creation and token issuance. Neither endpoint requires a token.

use crate::auth::{authenticate, hash_password, NewAccount, UserRepository};
use crate::error::AppError;
use crate::handlers::parse_body;
use crate::model::{AccountView, Credentials, NewUser, TokenView};
use crate::response::{created, ok};
use crate::validation::{FieldErrors, NON_FIELD_ERRORS};
use axum::{body::Bytes, extract::State, response::Response};
use std::sync::Arc;

/// `POST /create_user/`. Does not issue a token.
pub async fn create_user(
    State(users): State<Arc<dyn UserRepository>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let new_user = NewUser::from_json(&parse_body(&body)?)?;
    let account = NewAccount {
        password_hash: hash_password(&new_user.password)?,
        username: new_user.username,
        email: new_user.email,
    };
    let user = users.create(account).await?;
    tracing::info!(user = %user.username, "account created");
    Ok(created(AccountView::from(&user)))
}

/// `POST /api-token-auth/`. Returns the caller's token, creating it on first use.
pub async fn obtain_token(
    State(users): State<Arc<dyn UserRepository>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let credentials = Credentials::from_json(&parse_body(&body)?)?;
    let user = authenticate(users.as_ref(), &credentials.username, &credentials.password)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user = %credentials.username, "token request with bad credentials");
            FieldErrors::single(NON_FIELD_ERRORS, "Unable to log in with provided credentials.")
        })?;
    let token = users.token_for(user.id).await?;
    Ok(ok(TokenView { token }))
}
