//! `recent_emails` tool: subjects of the newest inbox messages.

use std::sync::Arc;

use agentwire_config::MailConfig;
use agentwire_core::error::ToolError;
use agentwire_core::tool::{Tool, ToolResult};
use async_trait::async_trait;

use crate::mail::{self, ImapConnector};

pub struct RecentEmailsTool {
    config: MailConfig,
    connector: Arc<dyn ImapConnector>,
}

impl RecentEmailsTool {
    pub fn new(config: MailConfig, connector: Arc<dyn ImapConnector>) -> Self {
        Self { config, connector }
    }
}

#[async_trait]
impl Tool for RecentEmailsTool {
    fn name(&self) -> &str {
        "recent_emails"
    }

    fn description(&self) -> &str {
        "List the subjects of the 10 most recent messages in the inbox, newest first."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "email_address": {
                    "type": "string",
                    "description": "Mailbox to read (defaults to the configured sender)"
                }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let address = arguments["email_address"]
            .as_str()
            .filter(|a| !a.is_empty())
            .map(String::from)
            .or_else(|| self.config.sender.clone());

        let Some(address) = address else {
            return Ok(ToolResult::failed(
                "Error: no mailbox address given and no sender configured",
            ));
        };

        match mail::try_recent_subjects(&self.config, self.connector.as_ref(), &address).await {
            Ok(subjects) => {
                let output = if subjects.is_empty() {
                    "No messages in the inbox.".to_string()
                } else {
                    subjects
                        .iter()
                        .map(|s| format!("- {s}"))
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                Ok(ToolResult {
                    data: Some(serde_json::json!(subjects)),
                    ..ToolResult::ok(output)
                })
            }
            Err(e) => Ok(ToolResult::failed(e.retrieve_report())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::test_support::*;

    #[tokio::test]
    async fn lists_subjects_as_bullets() {
        let inbox = Arc::new(FakeInbox::with_subjects(&["Old", "New"]));
        let tool = RecentEmailsTool::new(config_with_password(Some("pw")), inbox);

        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "- New\n- Old");
        assert_eq!(result.data, Some(serde_json::json!(["New", "Old"])));
    }

    #[tokio::test]
    async fn empty_inbox_says_so() {
        let tool = RecentEmailsTool::new(
            config_with_password(Some("pw")),
            Arc::new(FakeInbox::default()),
        );
        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(result.success);
        assert_eq!(result.data, Some(serde_json::json!([])));
    }

    #[tokio::test]
    async fn search_failure_is_reported_inline() {
        let inbox = Arc::new(FakeInbox {
            search_error: Some("IMAP search failed".into()),
            ..FakeInbox::default()
        });
        let tool = RecentEmailsTool::new(config_with_password(Some("pw")), inbox);

        let result = tool
            .execute(serde_json::json!({"email_address": "other@example.com"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.output.starts_with("Error retrieving emails:"));
    }
}
