//! HTTP handlers: the generic resource endpoint and the account endpoints.

pub mod account;
pub mod resource;

use crate::error::AppError;
use axum::body::Bytes;
use serde_json::Value;

/// An empty body reads as an empty object so that validation reports the missing fields.
pub(crate) fn parse_body(body: &Bytes) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("JSON parse error - {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_empty_object() {
        assert_eq!(parse_body(&Bytes::new()).unwrap(), serde_json::json!({}));
        assert_eq!(parse_body(&Bytes::from_static(b" \n")).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn malformed_json_is_bad_request() {
        let err = parse_body(&Bytes::from_static(b"{\"sku\":")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(m) if m.starts_with("JSON parse error")));
    }
}
