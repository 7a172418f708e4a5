use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::config::EmailConfig;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::VerificationMailer;
use crate::user::errors::MailerError;

/// SMTP-backed delivery of verification links.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    verification_base_url: String,
}

impl SmtpMailer {
    /// Build an SMTP mailer from configuration.
    ///
    /// # Arguments
    /// * `config` - SMTP host, credentials, and sender address
    /// * `verification_base_url` - Public base URL embedded in links
    pub fn new(config: &EmailConfig, verification_base_url: String) -> Result<Self, anyhow::Error> {
        let transport = if config.insecure {
            tracing::warn!(
                host = %config.smtp_host,
                port = config.smtp_port,
                "Using unencrypted SMTP transport"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
                .port(config.smtp_port);

            match (&config.smtp_username, &config.smtp_password) {
                (Some(username), Some(password)) => builder
                    .credentials(Credentials::new(username.clone(), password.clone()))
                    .build(),
                (None, None) => builder.build(),
                _ => anyhow::bail!("SMTP username and password must be provided together"),
            }
        };

        let from = config.from_address.parse::<Mailbox>()?;

        Ok(Self {
            transport,
            from,
            verification_base_url,
        })
    }

    fn verification_link(&self, token: &str) -> String {
        format!(
            "{}/api/auth/verify-email/{}",
            self.verification_base_url.trim_end_matches('/'),
            token
        )
    }
}

#[async_trait]
impl VerificationMailer for SmtpMailer {
    async fn send_verification(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), MailerError> {
        let to = email
            .as_str()
            .parse::<Mailbox>()
            .map_err(|e| MailerError::InvalidAddress(e.to_string()))?;

        let link = self.verification_link(token);
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Verify your email address")
            .body(format!(
                "Welcome! Confirm your email address by visiting:\n\n{}\n",
                link
            ))
            .map_err(|e| MailerError::SendFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::SendFailed(e.to_string()))?;

        tracing::info!("Verification email sent to {}", email);
        Ok(())
    }
}
