use std::sync::Arc;

use async_trait::async_trait;
use auth::Role;
use auth::TokenService;
use chrono::Duration;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::VerificationToken;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;
use crate::user::ports::VerificationMailer;
use crate::user::ports::VerificationTokenRepository;

/// Domain service implementation for account operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, VR, VM>
where
    UR: UserRepository,
    VR: VerificationTokenRepository,
    VM: VerificationMailer,
{
    users: Arc<UR>,
    verification_tokens: Arc<VR>,
    mailer: Arc<VM>,
    password_hasher: auth::PasswordHasher,
    token_service: Arc<TokenService>,
    verification_ttl: Duration,
}

impl<UR, VR, VM> UserService<UR, VR, VM>
where
    UR: UserRepository,
    VR: VerificationTokenRepository,
    VM: VerificationMailer,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `verification_tokens` - Verification token persistence implementation
    /// * `mailer` - Verification link delivery implementation
    /// * `token_service` - Access token signing and validation
    /// * `verification_ttl` - Lifetime of issued verification tokens
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(
        users: Arc<UR>,
        verification_tokens: Arc<VR>,
        mailer: Arc<VM>,
        token_service: Arc<TokenService>,
        verification_ttl: Duration,
    ) -> Self {
        Self {
            users,
            verification_tokens,
            mailer,
            password_hasher: auth::PasswordHasher::new(),
            token_service,
            verification_ttl,
        }
    }
}

#[async_trait]
impl<UR, VR, VM> UserServicePort for UserService<UR, VR, VM>
where
    UR: UserRepository,
    VR: VerificationTokenRepository,
    VM: VerificationMailer,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .password_hasher
            .hash(command.password.as_str())
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;

        let user = self
            .users
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
                role: Role::Client,
            })
            .await?;

        // Verification delivery is best-effort; the account is created
        // regardless.
        let token = VerificationToken::generate(user.id, self.verification_ttl);
        if let Err(e) = self.verification_tokens.store(&token).await {
            tracing::error!(
                "Failed to store verification token for user {}: {}",
                user.id,
                e
            );
        } else if let Err(e) = self
            .mailer
            .send_verification(&user.email, &token.token)
            .await
        {
            tracing::error!("Failed to send verification email to {}: {}", user.email, e);
        }

        Ok(user)
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<String, UserError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let password_matches = self
            .password_hasher
            .verify(password, &user.password_hash)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?;
        if !password_matches {
            return Err(UserError::InvalidCredentials);
        }

        if !user.email_verified {
            return Err(UserError::EmailNotVerified);
        }

        self.token_service
            .issue(user.id.0, user.role)
            .map_err(|e| UserError::Token(e.to_string()))
    }

    async fn verify_email(&self, token: &str) -> Result<(), UserError> {
        let user_id = self
            .verification_tokens
            .consume(token)
            .await?
            .ok_or(UserError::InvalidVerificationToken)?;

        self.users.mark_email_verified(&user_id).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}
