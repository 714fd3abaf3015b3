//! Mail actions: submit one message over SMTP, list recent inbox subjects
//! over IMAP.
//!
//! The public entry points never fail. Every problem, including a missing
//! password, comes back as a descriptive string so a chat loop or the mail
//! CLI can print it next to successful output. The `try_*` variants expose
//! the typed [`MailError`] for callers that need to tell the cases apart.
//!
//! Network access goes through the [`SmtpSubmitter`] and [`ImapConnector`]
//! traits; [`smtp::LettreSubmitter`] and [`imap::ImapsConnector`] are the
//! real transports.

pub mod imap;
pub mod smtp;

use std::time::Duration;

use agentwire_config::MailConfig;
use async_trait::async_trait;
use tracing::{debug, warn};

/// How many subjects `recent_subjects` returns at most.
pub const RECENT_LIMIT: usize = 10;

/// Placeholder for a message without a (non-empty) Subject header.
pub const NO_SUBJECT: &str = "(No Subject)";

/// A single-recipient plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Account credentials for SMTP/IMAP login.
#[derive(Clone)]
pub struct MailLogin {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for MailLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailLogin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("GMAIL_PASSWORD not set")]
    MissingCredential,

    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("timed out after {0}s")]
    Timeout(u64),
}

impl MailError {
    /// How a failed send is reported to the user.
    pub fn send_report(&self) -> String {
        match self {
            Self::MissingCredential => format!("Error: {self}"),
            _ => format!("Error sending email: {self}"),
        }
    }

    /// How a failed inbox listing is reported to the user.
    pub fn retrieve_report(&self) -> String {
        match self {
            Self::MissingCredential => format!("Error: {self}"),
            _ => format!("Error retrieving emails: {self}"),
        }
    }
}

/// Submits a finished message to an SMTP server.
#[async_trait]
pub trait SmtpSubmitter: Send + Sync {
    async fn submit(&self, login: &MailLogin, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Opens an authenticated IMAP session.
#[async_trait]
pub trait ImapConnector: Send + Sync {
    async fn open(&self, login: &MailLogin) -> Result<Box<dyn InboxSession>, MailError>;
}

/// An authenticated IMAP session.
#[async_trait]
pub trait InboxSession: Send {
    /// Select INBOX and return the ids from `SEARCH ALL`, ascending.
    async fn message_ids(&mut self) -> Result<Vec<u32>, MailError>;

    /// Fetch the full RFC 822 message. `None` when the server returned no body.
    async fn fetch_raw(&mut self, id: u32) -> Result<Option<Vec<u8>>, MailError>;

    async fn logout(&mut self) -> Result<(), MailError>;
}

fn require_password(config: &MailConfig) -> Result<String, MailError> {
    match config.password.as_deref() {
        Some(password) if !password.is_empty() => Ok(password.to_string()),
        _ => Err(MailError::MissingCredential),
    }
}

/// Send `email`, authenticating as its sender.
///
/// Returns `Email sent successfully to <recipient>` or an `Error...` string.
pub async fn send_email(
    config: &MailConfig,
    submitter: &dyn SmtpSubmitter,
    email: &OutgoingEmail,
) -> String {
    match try_send_email(config, submitter, email).await {
        Ok(()) => format!("Email sent successfully to {}", email.recipient),
        Err(e) => e.send_report(),
    }
}

/// Like [`send_email`], with the failure kept typed.
pub async fn try_send_email(
    config: &MailConfig,
    submitter: &dyn SmtpSubmitter,
    email: &OutgoingEmail,
) -> Result<(), MailError> {
    let password = require_password(config)?;
    let login = MailLogin {
        username: email.sender.clone(),
        password,
    };

    debug!(recipient = %email.recipient, subject = %email.subject, "Submitting email");
    with_timeout(config.timeout_secs, submitter.submit(&login, email)).await
}

/// Subjects of the (at most ten) newest inbox messages, newest first.
///
/// Any failure yields a single-element list holding the error text.
pub async fn recent_subjects(
    config: &MailConfig,
    connector: &dyn ImapConnector,
    address: &str,
) -> Vec<String> {
    match try_recent_subjects(config, connector, address).await {
        Ok(subjects) => subjects,
        Err(e) => vec![e.retrieve_report()],
    }
}

/// Like [`recent_subjects`], with the failure kept typed.
pub async fn try_recent_subjects(
    config: &MailConfig,
    connector: &dyn ImapConnector,
    address: &str,
) -> Result<Vec<String>, MailError> {
    let password = require_password(config)?;
    let login = MailLogin {
        username: address.to_string(),
        password,
    };

    with_timeout(config.timeout_secs, async {
        let mut session = connector.open(&login).await?;
        let ids = newest_first(session.message_ids().await?, RECENT_LIMIT);
        debug!(count = ids.len(), "Fetching recent messages");

        let mut subjects = Vec::with_capacity(ids.len());
        for id in ids {
            match session.fetch_raw(id).await? {
                Some(raw) => subjects.push(decode_subject(&raw)),
                None => debug!(id, "Server returned no body; skipping"),
            }
        }

        if let Err(e) = session.logout().await {
            warn!(error = %e, "IMAP logout failed");
        }
        Ok(subjects)
    })
    .await
}

/// Keep the `limit` highest ids, highest first.
fn newest_first(mut ids: Vec<u32>, limit: usize) -> Vec<u32> {
    ids.sort_unstable();
    ids.into_iter().rev().take(limit).collect()
}

/// Decode the Subject header of a raw message (RFC 2047 encoded words
/// included). Missing, empty, or unparseable headers give [`NO_SUBJECT`].
pub fn decode_subject(raw: &[u8]) -> String {
    use mailparse::MailHeaderMap;

    mailparse::parse_headers(raw)
        .ok()
        .and_then(|(headers, _)| headers.get_first_value("Subject"))
        .filter(|subject| !subject.is_empty())
        .unwrap_or_else(|| NO_SUBJECT.to_string())
}

async fn with_timeout<T>(
    secs: u64,
    operation: impl std::future::Future<Output = Result<T, MailError>>,
) -> Result<T, MailError> {
    tokio::time::timeout(Duration::from_secs(secs), operation)
        .await
        .map_err(|_| MailError::Timeout(secs))?
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub fn config_with_password(password: Option<&str>) -> MailConfig {
        MailConfig {
            password: password.map(String::from),
            sender: Some("me@example.com".into()),
            ..MailConfig::default()
        }
    }

    /// Records submissions; optionally fails every one.
    #[derive(Default)]
    pub struct RecordingSubmitter {
        pub calls: AtomicUsize,
        pub sent: Mutex<Vec<(String, OutgoingEmail)>>,
        pub fail_with: Option<String>,
    }

    #[async_trait]
    impl SmtpSubmitter for RecordingSubmitter {
        async fn submit(&self, login: &MailLogin, email: &OutgoingEmail) -> Result<(), MailError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(reason) = &self.fail_with {
                return Err(MailError::Transport(reason.clone()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((login.username.clone(), email.clone()));
            Ok(())
        }
    }

    /// An in-memory inbox keyed by sequence number.
    #[derive(Default)]
    pub struct FakeInbox {
        pub opens: AtomicUsize,
        pub messages: HashMap<u32, Vec<u8>>,
        pub search_error: Option<String>,
    }

    impl FakeInbox {
        pub fn with_subjects(subjects: &[&str]) -> Self {
            let messages = subjects
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let raw = format!("From: a@b.c\r\nSubject: {s}\r\n\r\nbody {i}\r\n");
                    (i as u32 + 1, raw.into_bytes())
                })
                .collect();
            Self {
                messages,
                ..Self::default()
            }
        }
    }

    struct FakeSession {
        ids: Result<Vec<u32>, String>,
        messages: HashMap<u32, Vec<u8>>,
    }

    #[async_trait]
    impl ImapConnector for FakeInbox {
        async fn open(&self, _login: &MailLogin) -> Result<Box<dyn InboxSession>, MailError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            let ids = match &self.search_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.messages.keys().copied().collect()),
            };
            Ok(Box::new(FakeSession {
                ids,
                messages: self.messages.clone(),
            }))
        }
    }

    #[async_trait]
    impl InboxSession for FakeSession {
        async fn message_ids(&mut self) -> Result<Vec<u32>, MailError> {
            self.ids.clone().map_err(MailError::Transport)
        }

        async fn fetch_raw(&mut self, id: u32) -> Result<Option<Vec<u8>>, MailError> {
            Ok(self.messages.get(&id).cloned())
        }

        async fn logout(&mut self) -> Result<(), MailError> {
            Ok(())
        }
    }
}
