use std::fmt;
use std::str::FromStr;

use auth::Role;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use rand::RngCore;

use crate::user::errors::DisplayNameError;
use crate::user::errors::EmailError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered account. The password hash is opaque storage
/// material; it never appears in a response body.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type.
///
/// Numeric, assigned by the store at creation and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user id from its decimal string form.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a decimal integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        s.parse::<i64>()
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type.
///
/// Trimmed, non-empty, bounded length. Not a login identifier; accounts are
/// keyed by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid display name.
    ///
    /// Leading and trailing whitespace is trimmed before validation.
    ///
    /// # Errors
    /// * `Empty` - Name is empty after trimming
    /// * `TooLong` - Name longer than 64 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(DisplayNameError::Empty);
        }
        if name.len() > Self::MAX_LENGTH {
            return Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: name.len(),
            });
        }
        Ok(Self(name))
    }

    /// Get the name as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type.
///
/// Validates format using an RFC 5322 compliant parser. Comparison is
/// case-sensitive on the stored form; the address is the account's unique
/// login key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get the address as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at registration.
///
/// Exists only for the duration of the request that carries it. The Debug
/// impl redacts the content so the value cannot leak through logging.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// Accept a password that satisfies the registration policy.
    ///
    /// # Errors
    /// * `TooShort` - Password shorter than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        if password.len() < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: password.len(),
            });
        }
        Ok(Self(password))
    }

    /// Get the plaintext for hashing.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Command to register a new account with domain types.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterUserCommand {
    /// Construct a new registration command from validated fields.
    pub fn new(name: DisplayName, email: EmailAddress, password: Password) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// Record handed to the store at creation.
///
/// The store assigns the id and creation timestamp; the verified flag
/// starts false.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
}

/// Single-use credential binding a user id to an email verification intent.
///
/// The value is 32 random bytes hex-encoded, so it cannot be guessed, and it
/// is invalidated atomically on first successful redemption.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    const TOKEN_BYTES: usize = 32;

    /// Generate a fresh token for `user_id`, expiring `ttl` from now.
    pub fn generate(user_id: UserId, ttl: Duration) -> Self {
        let mut bytes = [0u8; Self::TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        let now = Utc::now();
        Self {
            token: hex::encode(bytes),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the token has passed its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
