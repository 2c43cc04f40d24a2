//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport. When delivery is disabled in
//! configuration the rendered message is logged instead.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::info;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Debug, Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Returns true if mail is actually delivered over SMTP.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();
        Ok(transport)
    }

    /// Returns the link the user follows to choose a new password.
    #[must_use]
    pub fn password_reset_url(&self, token: &str) -> String {
        format!(
            "{}/reset-password?token={}",
            self.config.frontend_url.trim_end_matches('/'),
            token
        )
    }

    /// Sends a password reset email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), EmailError> {
        let reset_url = self.password_reset_url(token);

        let subject = "Reset your password - Spendwise";
        let body = format!(
            r"Hi {to_name},

We received a request to reset the password for your Spendwise account.
Choose a new password using the link below:

{reset_url}

This link will expire in 1 hour and can only be used once.

If you didn't request a password reset, you can safely ignore this email.

The Spendwise Team"
        );

        self.send_email(to_email, subject, &body).await
    }

    /// Sends a generic email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be sent.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), EmailError> {
        let email = self.build_message(to_email, subject, body)?;

        if !self.config.enabled {
            info!(to = %to_email, subject = %subject, body = %body, "Email delivery disabled, logging message");
            return Ok(());
        }

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }

    fn build_message(&self, to_email: &str, subject: &str, body: &str) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
