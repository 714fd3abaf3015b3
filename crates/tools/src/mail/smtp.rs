//! SMTP submission over STARTTLS with lettre.

use std::time::Duration;

use agentwire_config::MailConfig;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::{MailError, MailLogin, OutgoingEmail, SmtpSubmitter};

/// Submits through a STARTTLS relay such as `smtp.gmail.com:587`.
#[derive(Debug, Clone)]
pub struct LettreSubmitter {
    host: String,
    port: u16,
    timeout: Duration,
}

impl LettreSubmitter {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(
            &config.smtp_host,
            config.smtp_port,
            Duration::from_secs(config.timeout_secs),
        )
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

/// Build the MIME message: plain-text body, one recipient.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    Message::builder()
        .from(parse_mailbox(&email.sender)?)
        .to(parse_mailbox(&email.recipient)?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| MailError::Transport(e.to_string()))
}

#[async_trait]
impl SmtpSubmitter for LettreSubmitter {
    async fn submit(&self, login: &MailLogin, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(self.port)
            .credentials(Credentials::new(
                login.username.clone(),
                login.password.clone(),
            ))
            .timeout(Some(self.timeout))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        info!(host = %self.host, recipient = %email.recipient, "Email submitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(recipient: &str) -> OutgoingEmail {
        OutgoingEmail {
            sender: "Me <me@example.com>".into(),
            recipient: recipient.into(),
            subject: "Grocery list".into(),
            body: "eggs, flour, milk".into(),
        }
    }

    #[test]
    fn builds_plain_text_message() {
        let message = build_message(&email("friend@example.org")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: friend@example.org"));
        assert!(raw.contains("Subject: Grocery list"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("eggs, flour, milk"));
    }

    #[test]
    fn rejects_malformed_recipient() {
        let err = build_message(&email("not an address")).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress { .. }));
        assert!(err.to_string().contains("not an address"));
    }

    #[test]
    fn from_config_uses_mail_section() {
        let config = MailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 2525,
            timeout_secs: 5,
            ..MailConfig::default()
        };
        let submitter = LettreSubmitter::from_config(&config);
        assert_eq!(submitter.host, "smtp.example.com");
        assert_eq!(submitter.port, 2525);
        assert_eq!(submitter.timeout, Duration::from_secs(5));
    }
}
