use bcrypt::Version;
use thiserror::Error;

/// Work factor the backend's existing accounts were hashed with.
pub const DEFAULT_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),
    #[error("Failed to verify password: {0}")]
    Verification(String),
}

/// Hashes `password` with bcrypt at the given cost, using a fresh random salt.
///
/// The result is rendered in the `$2a$` form so it matches the hashes the
/// backend's verifier already stores.
pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    bcrypt::hash_with_result(password, cost)
        .map(|parts| parts.format_for_version(Version::TwoA))
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Returns `Ok(false)` on a mismatch and an error only when `hash` is not a
/// bcrypt hash at all.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|e| PasswordError::Verification(e.to_string()))
}
