//! Password hashing and verification using bcrypt

use crate::core::error::{AppError, Result};

/// bcrypt only reads this many bytes of input; longer passwords are refused
/// rather than silently truncated
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt hasher with a cost fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password with a fresh salt
    pub fn hash(&self, password: &str) -> Result<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::InvalidRequest(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only a corrupt stored hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        // Nothing this long was ever hashed, and bcrypt would only compare a prefix
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        Ok(bcrypt::verify(password, hash)?)
    }

    /// [`PasswordHasher::hash`] on the blocking pool
    pub async fn hash_blocking(&self, password: String) -> Result<String> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Task(format!("Password hashing panicked: {}", e)))?
    }

    /// [`PasswordHasher::verify`] on the blocking pool
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Task(format!("Password verification panicked: {}", e)))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
