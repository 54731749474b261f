//! Report delivery.
//!
//! The pipeline only sees [`ReportSink`]; SMTP details and credentials stay in
//! [`MailConfig`] and never reach the diff or the renderer.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::info;

use crate::domain::{Report, ReportFormat};
use crate::error::AppError;

pub const DEFAULT_SMTP_HOST: &str = "smtp.naver.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Accepts a finished report and sends it somewhere.
pub trait ReportSink {
    fn deliver(&self, report: &Report) -> Result<(), AppError>;
}

/// SMTP account and recipient.
#[derive(Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub user: String,
    pub password: String,
    pub recipient: String,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl MailConfig {
    /// Load from `.env` and the process environment.
    ///
    /// Required: `EMAIL_USER`, `EMAIL_PASS`, `RECEIVER_EMAIL`.
    /// Optional: `SMTP_HOST`, `SMTP_PORT`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&str> = ["EMAIL_USER", "EMAIL_PASS", "RECEIVER_EMAIL"]
            .into_iter()
            .filter(|&key| get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::config(format!(
                "Missing mail settings in environment (.env): {}",
                missing.join(", ")
            )));
        }

        let port = match get("SMTP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::config(format!("Invalid SMTP_PORT '{raw}': {e}")))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            user: get("EMAIL_USER").unwrap_or_default(),
            password: get("EMAIL_PASS").unwrap_or_default(),
            recipient: get("RECEIVER_EMAIL").unwrap_or_default(),
            host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port,
        })
    }
}

/// Sends reports over SMTP with implicit TLS (SMTPS).
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, report: &Report) -> Result<Message, AppError> {
        let from: Mailbox = self
            .config
            .user
            .parse()
            .map_err(|e| AppError::config(format!("Invalid sender address '{}': {e}", self.config.user)))?;
        let to: Mailbox = self
            .config
            .recipient
            .parse()
            .map_err(|e| AppError::config(format!("Invalid recipient address '{}': {e}", self.config.recipient)))?;

        let content_type = match report.format {
            ReportFormat::Html => ContentType::TEXT_HTML,
            ReportFormat::Plain => ContentType::TEXT_PLAIN,
        };

        Message::builder()
            .from(from)
            .to(to)
            .subject(report.subject.clone())
            .header(content_type)
            .body(report.body.clone())
            .map_err(|e| AppError::delivery(format!("Failed to build email: {e}")))
    }
}

impl ReportSink for SmtpMailer {
    fn deliver(&self, report: &Report) -> Result<(), AppError> {
        let message = self.build_message(report)?;

        let transport = SmtpTransport::relay(&self.config.host)
            .map_err(|e| AppError::delivery(format!("Invalid SMTP host '{}': {e}", self.config.host)))?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.user.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport
            .send(&message)
            .map_err(|e| AppError::delivery(format!("Email delivery failed: {e}")))?;

        info!("Report sent to {}.", self.config.recipient);
        Ok(())
    }
}

/// Prints the report instead of sending it (`--dry-run`).
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn deliver(&self, report: &Report) -> Result<(), AppError> {
        println!("Subject: {}\n", report.subject);
        println!("{}", report.body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    fn config() -> MailConfig {
        MailConfig::from_lookup(lookup(&[
            ("EMAIL_USER", " sender@naver.com "),
            ("EMAIL_PASS", "secret"),
            ("RECEIVER_EMAIL", "reader@example.com"),
        ]))
        .unwrap()
    }

    #[test]
    fn config_trims_and_defaults_transport() {
        let cfg = config();
        assert_eq!(cfg.user, "sender@naver.com");
        assert_eq!(cfg.host, DEFAULT_SMTP_HOST);
        assert_eq!(cfg.port, DEFAULT_SMTP_PORT);
    }

    #[test]
    fn config_lists_every_missing_key() {
        let err = MailConfig::from_lookup(lookup(&[("EMAIL_USER", "a@b.c"), ("EMAIL_PASS", "  ")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let msg = err.to_string();
        assert!(msg.contains("EMAIL_PASS"));
        assert!(msg.contains("RECEIVER_EMAIL"));
        assert!(!msg.contains("EMAIL_USER"));
    }

    #[test]
    fn config_rejects_bad_port() {
        let err = MailConfig::from_lookup(lookup(&[
            ("EMAIL_USER", "a@b.c"),
            ("EMAIL_PASS", "x"),
            ("RECEIVER_EMAIL", "d@e.f"),
            ("SMTP_PORT", "smtp"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SMTP_PORT"));
    }

    #[test]
    fn debug_output_hides_password() {
        let shown = format!("{:?}", config());
        assert!(!shown.contains("secret"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn message_uses_report_subject_and_format() {
        let mailer = SmtpMailer::new(config());
        let report = Report {
            subject: "[ETF 분석] 2025-06-02 포트폴리오 리포트".to_string(),
            body: "<p>hi</p>".to_string(),
            format: ReportFormat::Html,
        };

        let raw = String::from_utf8(mailer.build_message(&report).unwrap().formatted()).unwrap();
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("To: reader@example.com"));
    }

    #[test]
    fn invalid_recipient_is_a_config_error() {
        let mut cfg = config();
        cfg.recipient = "not-an-address".to_string();
        let report = Report {
            subject: "s".to_string(),
            body: "b".to_string(),
            format: ReportFormat::Plain,
        };
        let err = SmtpMailer::new(cfg).build_message(&report).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
