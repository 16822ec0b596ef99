//! Outbound mail capability: verification and password-reset emails over
//! SMTP. Sends are fire-and-report-failure; there are no retries here.
use lettre::message::{header::ContentType, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::error::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    /// Base URL for the links embedded in emails.
    pub app_url: String,
}

impl EmailConfig {
    pub fn from_config(config: &Config) -> Self {
        EmailConfig {
            smtp_host: config.smtp_host.clone(),
            smtp_port: config.smtp_port,
            smtp_username: config.smtp_username.clone(),
            smtp_password: config.smtp_password.clone(),
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
            app_url: config.app_url.clone(),
        }
    }
}

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        EmailService { config }
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let credentials = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .credentials(credentials)
                .build(),
        )
    }

    pub async fn send_verification_email(&self, to: &str, name: &str, token: &str) -> Result<()> {
        let verify_url = format!("{}/auth/verify?token={}", self.config.app_url, token);

        let text_body = format!(
            "Hi {name},\n\n\
             Thank you for signing up. To verify your email address, open the \
             following link:\n\n{verify_url}\n\n\
             The link expires in 24 hours. If you did not create this account \
             you can safely ignore this email.\n"
        );

        let html_body = format!(
            r#"<p>Hi <strong>{name}</strong>,</p>
<p>Thank you for signing up. To verify your email address, click the link below:</p>
<p><a href="{verify_url}">Verify email address</a></p>
<p>The link expires in 24 hours. If you did not create this account you can
safely ignore this email.</p>"#
        );

        self.send(to, "Verify your email address", &text_body, &html_body)
            .await
    }

    pub async fn send_password_reset_email(&self, to: &str, name: &str, token: &str) -> Result<()> {
        let reset_url = format!("{}/auth/reset-password?token={}", self.config.app_url, token);

        let text_body = format!(
            "Hi {name},\n\n\
             We received a request to reset the password for your account. To \
             choose a new password, open the following link:\n\n{reset_url}\n\n\
             The link expires in 15 minutes. If you did not request a reset, no \
             changes have been made and you can ignore this email.\n"
        );

        let html_body = format!(
            r#"<p>Hi <strong>{name}</strong>,</p>
<p>We received a request to reset the password for your account. To choose a
new password, click the link below:</p>
<p><a href="{reset_url}">Reset your password</a></p>
<p>The link expires in 15 minutes. If you did not request a reset, no changes
have been made and you can ignore this email.</p>"#
        );

        self.send(to, "Reset your password", &text_body, &html_body)
            .await
    }

    async fn send(&self, to: &str, subject: &str, text_body: &str, html_body: &str) -> Result<()> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| ApiError::Mail(format!("invalid from address: {}", e)))?;

        let to = to
            .parse()
            .map_err(|e| ApiError::Mail(format!("invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| ApiError::Mail(format!("failed to build message: {}", e)))?;

        let mailer = self.create_transport()?;

        mailer
            .send(message)
            .await
            .map_err(|e| ApiError::Mail(e.to_string()))?;

        Ok(())
    }

    /// False when SMTP credentials were never provided; sends will fail.
    pub fn is_configured(&self) -> bool {
        !self.config.smtp_host.is_empty()
            && !self.config.smtp_username.is_empty()
            && !self.config.smtp_password.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@localhost".to_string(),
            from_name: "Identity Service".to_string(),
            app_url: "http://localhost:3000".to_string(),
        }
    }

    #[test]
    fn unconfigured_without_credentials() {
        let service = EmailService::new(config());
        assert!(!service.is_configured());
    }

    #[test]
    fn configured_with_credentials() {
        let mut cfg = config();
        cfg.smtp_username = "mailer".to_string();
        cfg.smtp_password = "secret".to_string();
        assert!(EmailService::new(cfg).is_configured());
    }
}
