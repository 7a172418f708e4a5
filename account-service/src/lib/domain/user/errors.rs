use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name must not be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password policy violations at registration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for verification mail delivery
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to send mail: {0}")]
    SendFailed(String),
}

/// Top-level error for all account operations.
///
/// Display strings double as the user-facing messages the HTTP layer
/// returns, so the unknown-email and wrong-password cases share the single
/// `InvalidCredentials` variant and are byte-identical on the wire.
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user id: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid name: {0}")]
    InvalidDisplayName(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already registered: {0}")]
    EmailAlreadyRegistered(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token generation failed: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
