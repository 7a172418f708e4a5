use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::VerificationMailer;
use crate::user::errors::MailerError;

/// Mailer that writes verification links to the log instead of sending them.
///
/// Used when no SMTP configuration is present, so registration works in
/// development without a mail relay.
pub struct LogMailer {
    verification_base_url: String,
}

impl LogMailer {
    pub fn new(verification_base_url: String) -> Self {
        Self {
            verification_base_url,
        }
    }
}

#[async_trait]
impl VerificationMailer for LogMailer {
    async fn send_verification(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), MailerError> {
        tracing::info!(
            recipient = %email,
            "Verification link: {}/api/auth/verify-email/{}",
            self.verification_base_url.trim_end_matches('/'),
            token
        );
        Ok(())
    }
}
