//! Meal orchestrator: route to a breakfast, lunch, or dinner chef, or to
//! general chat.

use agentwire_config::ModelsConfig;
use agentwire_core::message::Conversation;
use agentwire_core::{Error, Result};
use async_trait::async_trait;
use tracing::info;

use super::Pipeline;
use super::chat::ASSISTANT_INSTRUCTION;
use crate::classifier::Classifier;
use crate::labels::MealLabel;
use crate::llm::LlmClient;
use crate::specialist::{ContextScope, MealReply, Specialist};

const BREAKFAST_CHEF: &str = "You are a specialist Breakfast Chef. Provide a delicious and energetic breakfast recipe based on the user's request. Focus on morning ingredients.";
const LUNCH_CHEF: &str = "You are a specialist Lunch Chef. Provide a balanced and quick lunch recipe based on the user's request. Focus on midday sustenance.";
const DINNER_CHEF: &str = "You are a specialist Dinner Chef. Provide a comforting and substantial dinner recipe based on the user's request. Focus on evening relaxation and flavor.";

/// The three chefs plus general chat, one per [`MealLabel`].
pub struct MealChefs {
    breakfast: Specialist,
    lunch: Specialist,
    dinner: Specialist,
    general: Specialist,
}

impl MealChefs {
    /// Stateless chefs that answer with a structured recipe.
    pub fn structured(models: &ModelsConfig) -> Self {
        let greet = |instruction: &str, meal: &str| {
            format!("{instruction} Start your greeting with 'Hi, I'm your {meal} chef.'")
        };
        let scope = ContextScope::LastUserMessage;
        Self {
            breakfast: Specialist::new(&models.chef, greet(BREAKFAST_CHEF, "breakfast"), scope)
                .titled("Breakfast Chef"),
            lunch: Specialist::new(&models.chef, greet(LUNCH_CHEF, "lunch"), scope)
                .titled("Lunch Chef"),
            dinner: Specialist::new(&models.dinner, greet(DINNER_CHEF, "dinner"), scope)
                .titled("Dinner Chef"),
            general: Specialist::new(&models.router, ASSISTANT_INSTRUCTION, scope)
                .titled("General Chat"),
        }
    }

    /// Free-text chefs that see the whole conversation, so a retry sees
    /// the previous attempt and the critique.
    pub fn revisable(models: &ModelsConfig) -> Self {
        let scope = ContextScope::FullHistory;
        Self {
            breakfast: Specialist::new(&models.chef, BREAKFAST_CHEF, scope)
                .titled("Breakfast Chef"),
            lunch: Specialist::new(&models.chef, LUNCH_CHEF, scope).titled("Lunch Chef"),
            dinner: Specialist::new(&models.dinner, DINNER_CHEF, scope).titled("Dinner Chef"),
            general: Specialist::new(&models.router, ASSISTANT_INSTRUCTION, scope),
        }
    }

    pub fn for_label(&self, label: MealLabel) -> &Specialist {
        match label {
            MealLabel::Breakfast => &self.breakfast,
            MealLabel::Lunch => &self.lunch,
            MealLabel::Dinner => &self.dinner,
            MealLabel::Other => &self.general,
        }
    }
}

pub struct MealPipeline {
    llm: LlmClient,
    router: Classifier<MealLabel>,
    chefs: MealChefs,
}

impl MealPipeline {
    pub fn new(llm: LlmClient, models: &ModelsConfig) -> Self {
        Self {
            router: Classifier::new(llm.clone(), &models.router),
            chefs: MealChefs::structured(models),
            llm,
        }
    }

    /// Route the current user turn and produce the matching reply.
    pub async fn reply(&self, conversation: &mut Conversation) -> Result<MealReply> {
        let request = conversation.current_user_turn()?.content.clone();
        let label = self.router.classify(&request).await?;
        info!(?label, "Router classified the request");

        let specialist = self.chefs.for_label(label);
        match label {
            MealLabel::Other => {
                let text = specialist.respond(&self.llm, conversation).await?;
                Ok(MealReply::General(text))
            }
            chef_label => {
                let chef = specialist.respond_structured(&self.llm, conversation).await?;
                MealReply::from_chef(chef_label, chef)
                    .ok_or_else(|| Error::Internal(format!("no chef for {chef_label:?}")))
            }
        }
    }
}

#[async_trait]
impl Pipeline for MealPipeline {
    fn name(&self) -> &str {
        "meal"
    }

    async fn run_turn(&mut self, conversation: &mut Conversation) -> Result<String> {
        self.reply(conversation).await?;
        // The specialist step appended exactly the text to show.
        Ok(conversation
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{chef_json, SequentialMockProvider};
    use agentwire_core::message::Message;
    use std::sync::Arc;

    fn pipeline(script: &[&str]) -> (Arc<SequentialMockProvider>, MealPipeline) {
        let provider = Arc::new(SequentialMockProvider::texts(script));
        let pipeline = MealPipeline::new(LlmClient::new(provider.clone()), &ModelsConfig::default());
        (provider, pipeline)
    }

    fn ask(text: &str) -> Conversation {
        let mut conv = Conversation::new();
        conv.push(Message::user(text));
        conv
    }

    #[tokio::test]
    async fn breakfast_goes_to_structured_breakfast_chef() {
        let body = chef_json("Fluffy Pancakes", &["flour", "milk", "eggs"]);
        let (provider, pipeline) = pipeline(&["BREAKFAST", &body]);
        let mut conv = ask("recipe for pancakes");

        let reply = pipeline.reply(&mut conv).await.unwrap();
        assert_eq!(reply.label(), MealLabel::Breakfast);
        assert_eq!(reply.chef().unwrap().ingredients.len(), 3);

        let chef_request = provider.request(1);
        assert_eq!(chef_request.model, "gpt-5-mini");
        assert!(chef_request.output_schema.is_some());
        assert!(chef_request.messages[0].content.contains("Breakfast Chef"));
    }

    #[tokio::test]
    async fn dinner_uses_dinner_model() {
        let body = chef_json("Stew", &["beef", "carrots"]);
        let (provider, mut pipeline) = pipeline(&["dinner", &body]);
        let mut conv = ask("something hearty tonight");

        let shown = pipeline.run_turn(&mut conv).await.unwrap();
        assert!(shown.starts_with("**Dinner Chef:**"));
        assert_eq!(provider.request(0).model, "gpt-5-nano");
        assert_eq!(provider.request(1).model, "gpt-4.1-mini");
    }

    #[tokio::test]
    async fn unmatched_label_goes_to_general_chat() {
        let (provider, mut pipeline) = pipeline(&["I don't know", "The sky is blue."]);
        let mut conv = ask("why is the sky blue?");

        let shown = pipeline.run_turn(&mut conv).await.unwrap();
        assert_eq!(shown, "**General Chat:**\nThe sky is blue.");
        assert!(provider.request(1).output_schema.is_none());
    }

    #[tokio::test]
    async fn chefs_only_see_the_current_turn() {
        let first = chef_json("Salad", &["lettuce"]);
        let second = chef_json("Omelette", &["eggs"]);
        let (provider, mut pipeline) = pipeline(&["LUNCH", &first, "BREAKFAST", &second]);
        let mut conv = ask("quick lunch");
        pipeline.run_turn(&mut conv).await.unwrap();
        conv.push(Message::user("and breakfast tomorrow"));
        pipeline.run_turn(&mut conv).await.unwrap();

        let router = provider.request(2);
        assert_eq!(router.messages[1].content, "and breakfast tomorrow");
        let chef = provider.request(3);
        assert_eq!(chef.messages.len(), 2);
        assert_eq!(conv.len(), 4);
    }

    #[tokio::test]
    async fn malformed_chef_output_fails_the_turn() {
        let (_, mut pipeline) = pipeline(&["LUNCH", "here is a sandwich"]);
        let mut conv = ask("lunch");
        assert!(pipeline.run_turn(&mut conv).await.is_err());
    }
}
