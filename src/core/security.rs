use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};

use crate::core::{AppError, Result};

/// One-way password encoding used when users are created
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> Result<String>;

    fn matches(&self, raw: &str, encoded: &str) -> Result<bool>;
}

/// Argon2id encoder with per-password random salts
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))
    }

    fn matches(&self, raw: &str, encoded: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(encoded)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(raw.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
