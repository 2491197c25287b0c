//! SMTP delivery of the intake report via lettre.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use super::ReportSender;
use super::render::{REPORT_SUBJECT, render_report};
use crate::error::ReportError;
use crate::intake::Profile;

// ── Configuration ───────────────────────────────────────────────────

/// Outbound mail settings, built from environment variables.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub from_email: String,
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        let server = std::env::var("SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string());

        let port: u16 = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);

        let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
        let password = SecretString::from(std::env::var("SMTP_PASSWORD").unwrap_or_default());
        let from_email =
            std::env::var("FROM_EMAIL").unwrap_or_else(|_| "noreply@example.com".to_string());

        Self {
            server,
            port,
            username,
            password,
            from_email,
        }
    }

    /// Both credentials are required before anything is sent.
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.expose_secret().is_empty()
    }
}

// ── Sender ──────────────────────────────────────────────────────────

/// Sends the plain-text report over SMTP with STARTTLS.
pub struct SmtpReportSender {
    config: SmtpConfig,
    timeout: Duration,
}

impl SmtpReportSender {
    pub fn new(config: SmtpConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }

    fn build_message(&self, recipient: &str, body: String) -> Result<Message, ReportError> {
        let from = self
            .config
            .from_email
            .parse::<Mailbox>()
            .map_err(|e| ReportError::InvalidAddress {
                address: self.config.from_email.clone(),
                reason: format!("{e}"),
            })?;
        let to = recipient.parse::<Mailbox>().map_err(|e| ReportError::InvalidAddress {
            address: recipient.to_string(),
            reason: format!("{e}"),
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(REPORT_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| ReportError::Build(e.to_string()))
    }
}

#[async_trait]
impl ReportSender for SmtpReportSender {
    async fn send(&self, recipient: &str, profile: &Profile) -> Result<(), ReportError> {
        if !self.config.is_configured() {
            return Err(ReportError::NotConfigured);
        }
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(ReportError::MissingRecipient);
        }

        let message = self.build_message(recipient, render_report(profile, Local::now()))?;

        let transport = SmtpTransport::starttls_relay(&self.config.server)
            .map_err(|e| ReportError::SendFailed(format!("relay {}: {e}", self.config.server)))?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.expose_secret().to_string(),
            ))
            .timeout(Some(self.timeout))
            .build();

        let send = tokio::task::spawn_blocking(move || transport.send(&message));
        match tokio::time::timeout(self.timeout, send).await {
            Ok(Ok(Ok(_))) => {
                info!(server = %self.config.server, "Report email sent");
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(ReportError::SendFailed(e.to_string())),
            Ok(Err(e)) => Err(ReportError::SendFailed(format!("send task failed: {e}"))),
            Err(_) => Err(ReportError::Timeout(self.timeout)),
        }
    }
}
