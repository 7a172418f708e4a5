//! Authentication primitives for the account service
//!
//! Provides the credential and session building blocks the service composes:
//! - Password hashing (Argon2id)
//! - Signed, time-bound access tokens (JWT)
//! - The closed role set carried by accounts and tokens
//!
//! The service defines its own domain traits and injects these implementations
//! at composition time. Nothing here touches storage or HTTP.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::Role;
//! use auth::TokenService;
//! use chrono::Duration;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//! let token = tokens.issue(42, Role::Client).unwrap();
//! let claims = tokens.validate(&token).unwrap();
//! assert_eq!(claims.user_id().unwrap(), 42);
//! assert_eq!(claims.role, Role::Client);
//! ```

pub mod jwt;
pub mod password;
pub mod role;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use role::Role;
pub use role::RoleParseError;
