//! Argon2id password hashes stored as PHC strings (`$argon2id$v=19$m=…,t=…,p=…$<salt>$<hash>`).

use crate::error::AppError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

const SALT_BYTES: usize = 16;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let bytes: [u8; SALT_BYTES] = rand::random();
    let salt = SaltString::encode_b64(&bytes)
        .map_err(|e| AppError::Internal(format!("password salt: {}", e)))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("password hash: {}", e)))?;
    Ok(hash.to_string())
}

/// False for malformed stored values as well as wrong passwords.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
