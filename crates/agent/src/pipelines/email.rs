//! Email assistant: a chat model with mail tools. Tool results are
//! appended to the conversation and shown; they are not sent back to the
//! model within the same turn.

use std::sync::Arc;

use agentwire_core::message::{Conversation, Message};
use agentwire_core::tool::{ToolCall, ToolRegistry};
use agentwire_core::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::Pipeline;
use crate::llm::LlmClient;

pub const EMAIL_INSTRUCTION: &str =
    "You are a helpful email assistant. You can send emails and list recent emails using the defined tools.";

pub struct EmailPipeline {
    llm: LlmClient,
    model: String,
    tools: Arc<ToolRegistry>,
}

impl EmailPipeline {
    pub fn new(llm: LlmClient, model: &str, tools: Arc<ToolRegistry>) -> Self {
        Self {
            llm,
            model: model.to_string(),
            tools,
        }
    }

    /// Run one tool call; every failure comes back as text.
    async fn run_tool(&self, call: &agentwire_core::message::MessageToolCall) -> String {
        let parsed = match ToolCall::try_from(call) {
            Ok(parsed) => parsed,
            Err(e) => return format!("Error: {e}"),
        };
        match self.tools.execute(&parsed).await {
            Ok(result) => {
                debug!(tool = %call.name, success = result.success, "Tool finished");
                result.output
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                format!("Error: {e}")
            }
        }
    }
}

#[async_trait]
impl Pipeline for EmailPipeline {
    fn name(&self) -> &str {
        "email"
    }

    async fn run_turn(&mut self, conversation: &mut Conversation) -> Result<String> {
        conversation.current_user_turn()?;

        let mut messages = vec![Message::system(EMAIL_INSTRUCTION)];
        messages.extend(conversation.messages().iter().cloned());
        let reply = self
            .llm
            .complete_with_tools(&self.model, messages, self.tools.definitions())
            .await?;

        let calls = reply.tool_calls.clone();
        let text = reply.content.trim().to_string();
        conversation.push(reply);

        let mut shown = Vec::new();
        if !text.is_empty() {
            shown.push(text);
        }
        for call in &calls {
            let output = self.run_tool(call).await;
            conversation.push(Message::tool_result(&call.id, &output));
            shown.push(output);
        }

        Ok(format!("Agent: {}", shown.join("\n")))
    }
}
