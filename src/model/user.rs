//! User accounts and the credential payloads accepted by the account endpoints.

use crate::validation::{FieldErrors, Fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Stored account. The password hash never leaves the crate in a response.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

/// Body of `POST /create_user/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(body)?;
        let user = NewUser {
            username: fields.string("username", USERNAME_MAX_LENGTH),
            email: fields.email("email", EMAIL_MAX_LENGTH),
            password: fields.unbounded_string("password"),
        };
        fields.finish(user)
    }
}

/// Account fields echoed back on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccountView {
    pub username: String,
    pub email: String,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        AccountView {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Body of `POST /api-token-auth/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(body)?;
        let credentials = Credentials {
            username: fields.string("username", USERNAME_MAX_LENGTH),
            password: fields.raw_string("password"),
        };
        fields.finish(credentials)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TokenView {
    pub token: String,
}
