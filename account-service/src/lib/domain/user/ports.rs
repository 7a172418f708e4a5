use async_trait::async_trait;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::VerificationToken;
use crate::user::errors::MailerError;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account with validated credentials.
    ///
    /// The account starts unverified with the client role. A verification
    /// token is issued and delivered out of band; delivery failures do not
    /// fail the registration.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `PasswordHash` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Authenticate by email and password, returning a signed access token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    ///
    /// # Arguments
    /// * `email` - Email address to authenticate
    /// * `password` - Plaintext password to check
    ///
    /// # Returns
    /// Signed access token string
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email unknown or password mismatch
    /// * `EmailNotVerified` - Credentials valid but email not yet verified
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<String, UserError>;

    /// Redeem a verification token and mark its account verified.
    ///
    /// The token is consumed atomically; a second redemption of the same
    /// value fails.
    ///
    /// # Arguments
    /// * `token` - Verification token string from the emailed link
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `InvalidVerificationToken` - Token unknown, expired, or already used
    /// * `DatabaseError` - Database operation failed
    async fn verify_email(&self, token: &str) -> Result<(), UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// User entity
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - New user record to create
    ///
    /// # Returns
    /// Created user entity with assigned id and timestamp
    ///
    /// # Errors
    /// * `EmailAlreadyRegistered` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Arguments
    /// * `email` - Email address to search for
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Set the verified flag on an existing user.
    ///
    /// # Arguments
    /// * `id` - User ID to mark verified
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn mark_email_verified(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for email verification tokens.
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync + 'static {
    /// Persist a freshly generated verification token.
    ///
    /// # Arguments
    /// * `token` - Token record to store
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn store(&self, token: &VerificationToken) -> Result<(), UserError>;

    /// Atomically consume a token, returning its user id.
    ///
    /// Removal and expiry check happen in one step so a token redeems at
    /// most once even under concurrent requests.
    ///
    /// # Arguments
    /// * `token` - Token string to consume
    ///
    /// # Returns
    /// Owning user id, or None if the token is unknown or expired
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn consume(&self, token: &str) -> Result<Option<UserId>, UserError>;
}

/// Outbound delivery of verification links.
#[async_trait]
pub trait VerificationMailer: Send + Sync + 'static {
    /// Send a verification link for `token` to `email`.
    ///
    /// # Arguments
    /// * `email` - Recipient address
    /// * `token` - Verification token to embed in the link
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `InvalidAddress` - Recipient address was rejected
    /// * `SendFailed` - Transport failed to deliver the message
    async fn send_verification(&self, email: &EmailAddress, token: &str)
        -> Result<(), MailerError>;
}
