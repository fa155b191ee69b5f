use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid mailbox `{0}`")]
    Address(String),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("failed to render mail template: {0}")]
    Template(#[from] askama::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Delivers through an SMTP relay with STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, cfg: &MailConfig) -> Result<Self, MailError> {
        let from = parse_mailbox(&cfg.from)?;
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(cfg.smtp_port);
        if let (Some(username), Some(password)) = (cfg.username.as_ref(), cfg.password.as_ref()) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&mail.to)?)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Writes mail to the log instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, "mail delivery disabled, logging only");
        tracing::debug!(body = %mail.html_body, "mail body");
        Ok(())
    }
}

pub fn build_mailer(cfg: &MailConfig) -> anyhow::Result<Arc<dyn Mailer>> {
    match cfg.smtp_host.as_deref() {
        Some(host) => {
            tracing::info!(host, port = cfg.smtp_port, "smtp mailer enabled");
            Ok(Arc::new(SmtpMailer::new(host, cfg)?))
        }
        None => {
            tracing::warn!("mail.smtp_host not set, confirmation mail will only be logged");
            Ok(Arc::new(LogMailer))
        }
    }
}

fn parse_mailbox(value: &str) -> Result<Mailbox, MailError> {
    value
        .parse::<Mailbox>()
        .map_err(|_| MailError::Address(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{LogMailer, MailError, Mailer, OutgoingMail, parse_mailbox};

    #[test]
    fn parse_mailbox_accepts_display_names() {
        let mailbox = parse_mailbox("IT-Cube <noreply@it-cube.example>").expect("should parse");
        assert_eq!(mailbox.email.to_string(), "noreply@it-cube.example");

        let err = parse_mailbox("not an address").expect_err("should fail");
        assert!(matches!(err, MailError::Address(_)));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        LogMailer
            .send(OutgoingMail {
                to: "alice@example.com".to_string(),
                subject: "IT-Cube | Email confirmation".to_string(),
                html_body: "<p>hi</p>".to_string(),
            })
            .await
            .expect("logging mailer should not fail");
    }
}
