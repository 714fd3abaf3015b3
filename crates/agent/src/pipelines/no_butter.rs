//! Meal orchestrator with a butter inspector. Chef output that contains
//! butter is sent back to the same chef with a critique.

use agentwire_config::ModelsConfig;
use agentwire_core::message::Conversation;
use agentwire_core::Result;
use async_trait::async_trait;
use tracing::info;

use super::Pipeline;
use super::meal::MealChefs;
use crate::classifier::Classifier;
use crate::labels::MealLabel;
use crate::llm::LlmClient;
use crate::revision::{ActiveSpecialist, RevisionLoop};

pub struct NoButterPipeline {
    llm: LlmClient,
    router: Classifier<MealLabel>,
    chefs: MealChefs,
    revision: RevisionLoop,
    active: Option<ActiveSpecialist>,
}

impl NoButterPipeline {
    pub fn new(llm: LlmClient, models: &ModelsConfig, max_attempts: u32) -> Self {
        Self {
            router: Classifier::new(llm.clone(), &models.router),
            chefs: MealChefs::revisable(models),
            revision: RevisionLoop::new(Classifier::new(llm.clone(), &models.router), max_attempts),
            active: None,
            llm,
        }
    }

    /// The specialist that answered the most recent turn.
    pub fn active_specialist(&self) -> Option<ActiveSpecialist> {
        self.active
    }
}

#[async_trait]
impl Pipeline for NoButterPipeline {
    fn name(&self) -> &str {
        "no-butter"
    }

    async fn run_turn(&mut self, conversation: &mut Conversation) -> Result<String> {
        let request = conversation.current_user_turn()?.content.clone();
        let label = self.router.classify(&request).await?;
        info!(?label, "Router classified the request");

        let active = ActiveSpecialist::for_label(label);
        self.active = Some(active);

        let outcome = self
            .revision
            .run(&self.llm, self.chefs.for_label(label), active, conversation)
            .await?;
        Ok(outcome.transcript.join("\n\n"))
    }
}
