//! Specialist step: a completion with a domain-specific system instruction
//! whose output is shown to the user and appended to the conversation.

use agentwire_core::message::{Conversation, Message};
use agentwire_core::provider::OutputSchema;
use agentwire_core::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::labels::MealLabel;
use crate::llm::LlmClient;

/// How much of the conversation a specialist sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextScope {
    /// Only the current user turn; stateless across turns.
    LastUserMessage,
    /// The whole conversation, including earlier specialist output and
    /// critiques.
    FullHistory,
}

#[derive(Debug, Clone)]
pub struct Specialist {
    title: Option<String>,
    model: String,
    instruction: String,
    scope: ContextScope,
}

impl Specialist {
    pub fn new(
        model: impl Into<String>,
        instruction: impl Into<String>,
        scope: ContextScope,
    ) -> Self {
        Self {
            title: None,
            model: model.into(),
            instruction: instruction.into(),
            scope,
        }
    }

    /// Display title, rendered as a `**Title:**` line above the output.
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The messages sent to the model: the instruction, then the scoped
    /// slice of the conversation.
    pub fn context(&self, conversation: &Conversation) -> Result<Vec<Message>> {
        let current = conversation.current_user_turn()?;
        let mut messages = vec![Message::system(&self.instruction)];
        match self.scope {
            ContextScope::LastUserMessage => messages.push(current.clone()),
            ContextScope::FullHistory => messages.extend(conversation.messages().iter().cloned()),
        }
        Ok(messages)
    }

    /// Prefix `body` with the title line, if any.
    pub fn present(&self, body: &str) -> String {
        match &self.title {
            Some(title) => format!("**{title}:**\n{body}"),
            None => body.to_string(),
        }
    }

    /// Free-text output. The presented text is appended and returned.
    pub async fn respond(&self, llm: &LlmClient, conversation: &mut Conversation) -> Result<String> {
        let messages = self.context(conversation)?;
        let reply = llm.complete(&self.model, messages).await?;
        let display = self.present(reply.content.trim());

        info!(specialist = self.title().unwrap_or("assistant"), "Specialist responded");
        conversation.push(Message::assistant(&display));
        Ok(display)
    }

    /// Structured output parsed into a [`ChefResponse`]. The rendered text
    /// is appended with the raw record as the message's data.
    pub async fn respond_structured(
        &self,
        llm: &LlmClient,
        conversation: &mut Conversation,
    ) -> Result<ChefResponse> {
        let messages = self.context(conversation)?;
        let (chef, raw): (ChefResponse, _) = llm
            .complete_structured(&self.model, messages, ChefResponse::output_schema())
            .await?;
        let display = self.present(&chef.render());

        info!(
            specialist = self.title().unwrap_or("assistant"),
            recipe = %chef.recipe_name,
            "Specialist responded"
        );
        conversation.push(Message::assistant(display).with_data(raw));
        Ok(chef)
    }
}

/// A chef's structured answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChefResponse {
    pub greeting: String,
    pub recipe_name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub energy_level: String,
}

impl ChefResponse {
    pub fn output_schema() -> OutputSchema {
        OutputSchema {
            name: "chef_response".into(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "greeting": { "type": "string" },
                    "recipe_name": { "type": "string" },
                    "ingredients": { "type": "array", "items": { "type": "string" } },
                    "instructions": { "type": "array", "items": { "type": "string" } },
                    "energy_level": { "type": "string" }
                },
                "required": ["greeting", "recipe_name", "ingredients", "instructions", "energy_level"],
                "additionalProperties": false
            }),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n\nRecipe Name: {}\n", self.greeting, self.recipe_name);
        out.push_str("Ingredients:\n");
        for ingredient in &self.ingredients {
            out.push_str(&format!("- {ingredient}\n"));
        }
        out.push_str("Instructions:\n");
        for (i, step) in self.instructions.iter().enumerate() {
            out.push_str(&format!("{}. {step}\n", i + 1));
        }
        out.push_str(&format!("Energy Level: {}", self.energy_level));
        out
    }
}

/// What the meal pipeline produced for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "label", content = "reply", rename_all = "lowercase")]
pub enum MealReply {
    Breakfast(ChefResponse),
    Lunch(ChefResponse),
    Dinner(ChefResponse),
    General(String),
}

impl MealReply {
    /// Wrap a chef's answer in the variant for `label`.
    pub fn from_chef(label: MealLabel, chef: ChefResponse) -> Option<Self> {
        match label {
            MealLabel::Breakfast => Some(Self::Breakfast(chef)),
            MealLabel::Lunch => Some(Self::Lunch(chef)),
            MealLabel::Dinner => Some(Self::Dinner(chef)),
            MealLabel::Other => None,
        }
    }

    pub fn label(&self) -> MealLabel {
        match self {
            Self::Breakfast(_) => MealLabel::Breakfast,
            Self::Lunch(_) => MealLabel::Lunch,
            Self::Dinner(_) => MealLabel::Dinner,
            Self::General(_) => MealLabel::Other,
        }
    }

    pub fn chef(&self) -> Option<&ChefResponse> {
        match self {
            Self::Breakfast(c) | Self::Lunch(c) | Self::Dinner(c) => Some(c),
            Self::General(_) => None,
        }
    }
}
