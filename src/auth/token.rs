//! Opaque API tokens and the `Authorization` header that carries them.

use crate::error::AuthFailure;
use axum::http::HeaderValue;

pub const TOKEN_BYTES: usize = 20;

/// Accepted schemes, compared case-insensitively.
const SCHEMES: [&str; 2] = ["token", "bearer"];

/// 40 lowercase hex characters.
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Extract the key from `Authorization: Token <key>` or `Authorization: Bearer <key>`.
/// A missing header or a foreign scheme counts as no credentials at all.
pub fn parse_authorization(header: Option<&HeaderValue>) -> Result<String, AuthFailure> {
    let header = header.ok_or(AuthFailure::MissingCredentials)?;
    let raw = std::str::from_utf8(header.as_bytes()).map_err(|_| AuthFailure::MalformedHeader)?;
    let mut parts = raw.split_whitespace();
    let scheme = parts.next().ok_or(AuthFailure::MissingCredentials)?;
    if !SCHEMES.iter().any(|s| scheme.eq_ignore_ascii_case(s)) {
        return Err(AuthFailure::MissingCredentials);
    }
    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(key.to_string()),
        _ => Err(AuthFailure::MalformedHeader),
    }
}
