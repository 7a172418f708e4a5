use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;
use crate::role::Role;

/// Claims carried by every issued access token.
///
/// `sub` holds the numeric user id in decimal form, per RFC 7519's
/// string-typed subject. `iat` and `exp` are Unix timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Subject: the account's numeric id, as a decimal string
    pub sub: String,

    /// Access level granted to the bearer
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Create claims for a user session expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `user_id` - Numeric account id to bind the token to
    /// * `role` - Access level to embed
    /// * `ttl` - Validity window measured from the current instant
    pub fn for_user(user_id: i64, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Numeric account id carried in the subject claim.
    ///
    /// # Errors
    /// * `InvalidToken` - The subject is not a decimal id (the token was not
    ///   issued by this service)
    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub
            .parse()
            .map_err(|_| TokenError::InvalidToken("subject is not a numeric id".to_string()))
    }
}
