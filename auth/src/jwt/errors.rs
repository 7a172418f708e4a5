use thiserror::Error;

/// Error type for access token operations.
///
/// The expired/invalid split exists for operator logs only; the HTTP layer
/// collapses every validation failure into one unauthenticated reply so
/// callers cannot probe which check rejected them.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
