//! Mail tools for agentwire.
//!
//! `mail` holds the SMTP/IMAP actions shared by the email pipeline and the
//! `agentwire-mail` binary; `send_email` and `recent_emails` wrap them as
//! [`Tool`](agentwire_core::Tool)s.

pub mod mail;
pub mod recent_emails;
pub mod send_email;

use std::sync::Arc;

use agentwire_config::MailConfig;
use agentwire_core::tool::ToolRegistry;

use mail::imap::ImapsConnector;
use mail::smtp::LettreSubmitter;
use mail::{ImapConnector, SmtpSubmitter};

/// Registry with both mail tools over the real SMTP/IMAP transports.
pub fn mail_registry(config: &MailConfig) -> ToolRegistry {
    mail_registry_with(
        config,
        Arc::new(LettreSubmitter::from_config(config)),
        Arc::new(ImapsConnector::from_config(config)),
    )
}

/// Registry with both mail tools over the given transports.
pub fn mail_registry_with(
    config: &MailConfig,
    submitter: Arc<dyn SmtpSubmitter>,
    connector: Arc<dyn ImapConnector>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(send_email::SendEmailTool::new(
        config.clone(),
        submitter,
    )));
    registry.register(Box::new(recent_emails::RecentEmailsTool::new(
        config.clone(),
        connector,
    )));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_both_mail_tools() {
        let registry = mail_registry(&MailConfig::default());
        assert_eq!(registry.names(), vec!["recent_emails", "send_email"]);
        assert_eq!(registry.definitions().len(), 2);
    }
}
