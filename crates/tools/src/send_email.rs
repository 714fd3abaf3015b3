//! `send_email` tool: lets the email assistant send a message from the
//! configured account.

use std::sync::Arc;

use agentwire_config::MailConfig;
use agentwire_core::error::ToolError;
use agentwire_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;

use crate::mail::{self, OutgoingEmail, SmtpSubmitter};

pub struct SendEmailTool {
    config: MailConfig,
    submitter: Arc<dyn SmtpSubmitter>,
}

impl SendEmailTool {
    pub fn new(config: MailConfig, submitter: Arc<dyn SmtpSubmitter>) -> Self {
        Self { config, submitter }
    }
}

#[derive(Debug, Deserialize)]
struct SendEmailArgs {
    recipient: String,
    subject: String,
    body: String,
}

#[async_trait]
impl Tool for SendEmailTool {
    fn name(&self) -> &str {
        "send_email"
    }

    fn description(&self) -> &str {
        "Send a plain-text email from the user's account to a single recipient."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "recipient": {
                    "type": "string",
                    "description": "Email address of the recipient"
                },
                "subject": {
                    "type": "string",
                    "description": "Subject line"
                },
                "body": {
                    "type": "string",
                    "description": "Plain-text message body"
                }
            },
            "required": ["recipient", "subject", "body"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: SendEmailArgs = serde_json::from_value(arguments)
            .map_err(|e| ToolError::InvalidArguments(format!("send_email: {e}")))?;

        let Some(sender) = self.config.sender.clone().filter(|s| !s.is_empty()) else {
            return Ok(ToolResult::failed(
                "Error: no sender address configured (set GMAIL_SENDER or GMAIL_USERNAME)",
            ));
        };

        let email = OutgoingEmail {
            sender,
            recipient: args.recipient,
            subject: args.subject,
            body: args.body,
        };

        let result = match mail::try_send_email(&self.config, self.submitter.as_ref(), &email).await
        {
            Ok(()) => ToolResult::ok(format!("Email sent successfully to {}", email.recipient)),
            Err(e) => ToolResult::failed(e.send_report()),
        };
        Ok(result)
    }
}
