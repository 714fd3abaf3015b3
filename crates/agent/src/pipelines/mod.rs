//! The runnable pipelines. Each one is a small graph of classifier,
//! specialist, revision, and tool steps behind the [`Pipeline`] trait.

pub mod chat;
pub mod email;
pub mod meal;
pub mod no_butter;
pub mod recipe;

use std::sync::Arc;

use agentwire_config::AppConfig;
use agentwire_core::message::Conversation;
use agentwire_core::Result;
use async_trait::async_trait;

use crate::llm::LlmClient;

pub use chat::ChatPipeline;
pub use email::EmailPipeline;
pub use meal::MealPipeline;
pub use no_butter::NoButterPipeline;
pub use recipe::RecipePipeline;

/// One turn of a pipeline: the conversation ends with the user's message on
/// entry; the pipeline appends its output and returns the text to show.
#[async_trait]
pub trait Pipeline: Send {
    fn name(&self) -> &str;

    async fn run_turn(&mut self, conversation: &mut Conversation) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Chat,
    Meal,
    Recipe,
    NoButter,
    Email,
}

impl PipelineKind {
    /// Startup banner lines.
    pub fn banner(self) -> &'static str {
        match self {
            Self::Chat => "Starting chat assistant...",
            Self::Meal => "Starting meal orchestrator...\nAsk for a breakfast, lunch, or dinner recipe!",
            Self::Recipe => "Starting recipe agent...\nAsk for a recipe to see the multi-agent interaction!",
            Self::NoButter => "Starting meal orchestrator with butter inspection...\nAsk for a breakfast, lunch, or dinner recipe!",
            Self::Email => "Starting email assistant...\nMake sure GMAIL_PASSWORD is set in your environment or .env file.",
        }
    }
}

/// Build a pipeline from configuration and a resolved completion client.
pub fn build(kind: PipelineKind, llm: LlmClient, config: &AppConfig) -> Box<dyn Pipeline> {
    let models = &config.models;
    match kind {
        PipelineKind::Chat => Box::new(ChatPipeline::new(llm, &models.chat)),
        PipelineKind::Meal => Box::new(MealPipeline::new(llm, models)),
        PipelineKind::Recipe => Box::new(RecipePipeline::new(llm, models)),
        PipelineKind::NoButter => Box::new(NoButterPipeline::new(
            llm,
            models,
            config.revision.max_attempts,
        )),
        PipelineKind::Email => Box::new(EmailPipeline::new(
            llm,
            &models.chat,
            Arc::new(agentwire_tools::mail_registry(&config.mail)),
        )),
    }
}
