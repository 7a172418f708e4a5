use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessClaims;
use super::errors::TokenError;
use crate::role::Role;

/// Issues and validates signed, time-bound access tokens.
///
/// Tokens are HS256 JWTs carrying [`AccessClaims`]. They are stateless:
/// nothing is stored server-side and expiry is the only bound, so an
/// individual token cannot be revoked before it lapses.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    /// Create a new token service.
    ///
    /// # Arguments
    /// * `secret` - Signing secret shared by issue and validate; at least
    ///   256 bits (32 bytes) for HS256, sourced from configuration rather
    ///   than code
    /// * `ttl` - Validity window stamped into every issued token
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Issue a signed token binding `user_id` and `role` for the configured
    /// validity window.
    ///
    /// # Errors
    /// * `SigningFailed` - The payload could not be signed
    pub fn issue(&self, user_id: i64, role: Role) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);
        let claims = AccessClaims::for_user(user_id, role, self.ttl);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Validate a token and return the embedded claims.
    ///
    /// Signature integrity is checked before anything else, then expiry with
    /// zero leeway: tokens are validated by the process that issued them, so
    /// there is no clock skew to absorb. Claims that fail to deserialize
    /// (missing fields, a role outside the closed set) are invalid.
    ///
    /// # Errors
    /// * `TokenExpired` - The expiry claim has elapsed
    /// * `InvalidToken` - Malformed token, bad signature, or foreign claims
    pub fn validate(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                _ => TokenError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
