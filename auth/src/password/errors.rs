use thiserror::Error;

/// Error type for password hashing operations.
///
/// A password mismatch is not an error; `verify` reports it as `Ok(false)`.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
