//! Email delivery — sends the HTML report over SMTPS.
//!
//! Credentials come from the environment (GMAIL_USER, GMAIL_APP_PASSWORD,
//! RECEIVER_EMAIL), matching the secrets layout of the scheduled job that
//! runs the scan.

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// SMTP configuration for report delivery.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub user: String,
    pub app_password: String,
    pub to: String,
}

impl MailConfig {
    /// Read the configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let user = std::env::var("GMAIL_USER").context("GMAIL_USER is not set")?;
        let app_password =
            std::env::var("GMAIL_APP_PASSWORD").context("GMAIL_APP_PASSWORD is not set")?;
        let to = std::env::var("RECEIVER_EMAIL").context("RECEIVER_EMAIL is not set")?;
        Ok(Self {
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            user,
            app_password,
            to,
        })
    }
}

/// Send an HTML report.
pub fn send_report(config: &MailConfig, subject: &str, html_body: String) -> Result<()> {
    let email = Message::builder()
        .from(config.user.parse().context("invalid sender address")?)
        .to(config.to.parse().context("invalid receiver address")?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html_body)
        .context("build email message")?;

    let mailer = SmtpTransport::relay(&config.smtp_host)
        .context("configure SMTP relay")?
        .credentials(Credentials::new(
            config.user.clone(),
            config.app_password.clone(),
        ))
        .build();

    mailer.send(&email).context("send report email")?;
    Ok(())
}
