//! Plain assistant over the full history.

use agentwire_core::message::Conversation;
use agentwire_core::Result;
use async_trait::async_trait;

use super::Pipeline;
use crate::llm::LlmClient;
use crate::specialist::{ContextScope, Specialist};

pub const ASSISTANT_INSTRUCTION: &str = "You are a helpful assistant.";

pub struct ChatPipeline {
    llm: LlmClient,
    assistant: Specialist,
}

impl ChatPipeline {
    pub fn new(llm: LlmClient, model: &str) -> Self {
        Self {
            llm,
            assistant: Specialist::new(model, ASSISTANT_INSTRUCTION, ContextScope::FullHistory),
        }
    }
}

#[async_trait]
impl Pipeline for ChatPipeline {
    fn name(&self) -> &str {
        "chat"
    }

    async fn run_turn(&mut self, conversation: &mut Conversation) -> Result<String> {
        let reply = self.assistant.respond(&self.llm, conversation).await?;
        Ok(format!("Agent: {reply}"))
    }
}
