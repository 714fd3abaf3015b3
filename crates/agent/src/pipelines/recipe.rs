//! Recipe agent: a master chef answers recipe requests and a creative chef
//! follows up with a twist. Anything else goes to general chat.

use agentwire_config::ModelsConfig;
use agentwire_core::message::{Conversation, Message};
use agentwire_core::Result;
use async_trait::async_trait;
use tracing::info;

use super::Pipeline;
use super::chat::ASSISTANT_INSTRUCTION;
use crate::classifier::Classifier;
use crate::labels::RecipeIntent;
use crate::llm::LlmClient;
use crate::specialist::{ContextScope, Specialist};

const MASTER_CHEF: &str =
    "You are a master chef. Provide a detailed recipe for the user's request.";
const CREATIVE_CHEF: &str = "You are an experimental chef. The user asked for a recipe, and a master chef provided one. Your job is to suggest a creative, interesting variation or twist on that recipe. Be brief and focus on the modification.";

pub struct RecipePipeline {
    llm: LlmClient,
    router: Classifier<RecipeIntent>,
    master: Specialist,
    creative: Specialist,
    general: Specialist,
}

impl RecipePipeline {
    pub fn new(llm: LlmClient, models: &ModelsConfig) -> Self {
        Self {
            router: Classifier::new(llm.clone(), &models.router),
            master: Specialist::new(&models.chef, MASTER_CHEF, ContextScope::LastUserMessage)
                .titled("Master Chef"),
            creative: Specialist::new(&models.chef, CREATIVE_CHEF, ContextScope::LastUserMessage)
                .titled("Creative Chef"),
            general: Specialist::new(&models.router, ASSISTANT_INSTRUCTION, ContextScope::FullHistory),
            llm,
        }
    }

    /// The creative chef's prompt pairs the request with the master recipe.
    fn creative_prompt(request: &str, recipe: &str) -> String {
        format!("User Request: {request}\n\nOriginal Recipe: {recipe}")
    }
}

#[async_trait]
impl Pipeline for RecipePipeline {
    fn name(&self) -> &str {
        "recipe"
    }

    async fn run_turn(&mut self, conversation: &mut Conversation) -> Result<String> {
        let request = conversation.current_user_turn()?.content.clone();
        let intent = self.router.classify(&request).await?;
        info!(?intent, "Recipe intent");

        if intent == RecipeIntent::No {
            return self.general.respond(&self.llm, conversation).await;
        }

        let recipe = self.master.respond(&self.llm, conversation).await?;

        // The creative chef answers a synthesized turn rather than the log.
        let mut scratch = Conversation::new();
        scratch.push(Message::user(Self::creative_prompt(&request, &recipe)));
        let variation = self.creative.respond(&self.llm, &mut scratch).await?;
        conversation.push(Message::assistant(&variation));

        Ok(format!("{recipe}\n\n{variation}"))
    }
}
