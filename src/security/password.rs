//! Scrypt-based lobby password hashing.
//!
//! Hashing and verification never special-case the empty string: an empty
//! lobby password still gets a real scrypt hash with a random salt, and
//! verifying an empty candidate against it runs through the same code path
//! as any other password.

use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand_core::OsRng;
use scrypt::{Params, Scrypt};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hash `password` (may be empty) with a freshly generated salt, using the
/// crate's default scrypt cost parameters.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_params(password, Params::default())
}

/// Hash `password` with an explicit cost factor (`SecurityConfig::scrypt`),
/// so a deployment can tune cost vs. latency without changing this module.
pub fn hash_password_with_params(password: &str, params: Params) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Scrypt
        .hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify `candidate` (may be empty) against a hash produced by
/// [`hash_password`]. Returns `Ok(true)` / `Ok(false)` for a well-formed
/// hash; `Err` only if `stored_hash` itself is not a valid PHC string,
/// which indicates a bug upstream rather than a wrong password.
pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
    Ok(Scrypt
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}
