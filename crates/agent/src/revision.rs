//! Bounded revision loop: a specialist's output is inspected, and on a
//! negative verdict the specialist is asked to try again.
//!
//! ```text
//! Generated → Inspected → Accepted
//!                       ↘ Rejected → Critiqued → Generated …
//! ```
//!
//! The specialist is invoked at most `max_attempts` times per turn. When
//! the last allowed attempt is still rejected the turn fails with
//! [`Error::RevisionExhausted`].

use agentwire_core::message::{Conversation, Message};
use agentwire_core::{Error, Result};
use tracing::{debug, info, warn};

use crate::classifier::Classifier;
use crate::labels::{InspectionVerdict, MealLabel};
use crate::llm::LlmClient;
use crate::specialist::Specialist;

pub const BUTTER_CRITIQUE: &str =
    "The inspector found butter in your recipe. Please rewrite the recipe WITHOUT using butter.";

pub const INSPECTOR_REJECTED: &str = "[Inspector]: Butter detected! Sending back for revision...";
pub const INSPECTOR_PASSED: &str = "[Inspector]: Recipe passed (no butter).";

/// Which specialist produced the most recent output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSpecialist {
    Chef(MealLabel),
    GeneralChat,
}

impl ActiveSpecialist {
    pub fn for_label(label: MealLabel) -> Self {
        match label {
            MealLabel::Other => Self::GeneralChat,
            chef => Self::Chef(chef),
        }
    }

    /// General chat output is never inspected.
    pub fn is_inspected(self) -> bool {
        matches!(self, Self::Chef(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionState {
    Generated,
    Inspected(InspectionVerdict),
    Accepted,
    Rejected,
    Critiqued,
}

/// The result of a finished revision loop.
#[derive(Debug, Clone)]
pub struct RevisionOutcome {
    /// The accepted output.
    pub accepted: String,
    /// Specialist invocations it took.
    pub attempts: u32,
    /// Every attempt and inspector note, in order.
    pub transcript: Vec<String>,
}

pub struct RevisionLoop {
    inspector: Classifier<InspectionVerdict>,
    critique: String,
    max_attempts: u32,
}

impl RevisionLoop {
    pub fn new(inspector: Classifier<InspectionVerdict>, max_attempts: u32) -> Self {
        Self {
            inspector,
            critique: BUTTER_CRITIQUE.into(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Inspect one specialist output.
    pub async fn inspect(&self, output: &str) -> Result<InspectionVerdict> {
        self.inspector.classify(output).await
    }

    /// Run `specialist` against the current user turn until its output is
    /// accepted or the attempt ceiling is reached.
    pub async fn run(
        &self,
        llm: &LlmClient,
        specialist: &Specialist,
        active: ActiveSpecialist,
        conversation: &mut Conversation,
    ) -> Result<RevisionOutcome> {
        let mut attempts = 1;
        let mut output = specialist.respond(llm, conversation).await?;
        let mut transcript = vec![output.clone()];
        let mut state = RevisionState::Generated;

        loop {
            debug!(?state, attempts, "Revision step");
            state = match state {
                RevisionState::Generated if !active.is_inspected() => RevisionState::Accepted,
                RevisionState::Generated => RevisionState::Inspected(self.inspect(&output).await?),
                RevisionState::Inspected(InspectionVerdict::Pass) => {
                    transcript.push(INSPECTOR_PASSED.into());
                    RevisionState::Accepted
                }
                RevisionState::Inspected(InspectionVerdict::ContainsButter) => {
                    RevisionState::Rejected
                }
                RevisionState::Rejected if attempts >= self.max_attempts => {
                    warn!(?active, attempts, "Revision ceiling reached");
                    return Err(Error::RevisionExhausted {
                        specialist: specialist.title().unwrap_or("assistant").to_string(),
                        attempts,
                    });
                }
                RevisionState::Rejected => {
                    transcript.push(INSPECTOR_REJECTED.into());
                    conversation.push(Message::user(&self.critique));
                    RevisionState::Critiqued
                }
                RevisionState::Critiqued => {
                    attempts += 1;
                    output = specialist.respond(llm, conversation).await?;
                    transcript.push(output.clone());
                    RevisionState::Generated
                }
                RevisionState::Accepted => {
                    info!(?active, attempts, "Output accepted");
                    return Ok(RevisionOutcome {
                        accepted: output,
                        attempts,
                        transcript,
                    });
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specialist::ContextScope;
    use crate::test_helpers::SequentialMockProvider;
    use agentwire_core::message::Role;
    use std::sync::Arc;

    fn setup(script: &[&str], max_attempts: u32) -> (Arc<SequentialMockProvider>, LlmClient, RevisionLoop) {
        let provider = Arc::new(SequentialMockProvider::texts(script));
        let llm = LlmClient::new(provider.clone());
        let revision = RevisionLoop::new(Classifier::new(llm.clone(), "inspector"), max_attempts);
        (provider, llm, revision)
    }

    fn chef() -> Specialist {
        Specialist::new("chef", "You are a chef.", ContextScope::FullHistory).titled("Breakfast Chef")
    }

    fn user_turn(text: &str) -> Conversation {
        let mut conv = Conversation::new();
        conv.push(Message::user(text));
        conv
    }

    #[tokio::test]
    async fn accepted_output_needs_no_critique() {
        let (provider, llm, revision) = setup(&["Oat porridge", "PASS"], 3);
        let mut conv = user_turn("breakfast?");

        let outcome = revision
            .run(&llm, &chef(), ActiveSpecialist::Chef(MealLabel::Breakfast), &mut conv)
            .await
            .unwrap();

        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.accepted, "**Breakfast Chef:**\nOat porridge");
        assert_eq!(provider.call_count(), 2);
        assert_eq!(conv.len(), 2);
        assert!(!conv.messages().iter().any(|m| m.content == BUTTER_CRITIQUE));
    }

    #[tokio::test]
    async fn rejection_appends_one_critique_and_reinvokes_with_history() {
        let (provider, llm, revision) =
            setup(&["Toast with butter", "CONTAINS_BUTTER", "Toast with olive oil", "PASS"], 3);
        let mut conv = user_turn("toast recipe");

        let outcome = revision
            .run(&llm, &chef(), ActiveSpecialist::Chef(MealLabel::Breakfast), &mut conv)
            .await
            .unwrap();

        assert_eq!(outcome.attempts, 2);
        assert!(outcome.accepted.contains("olive oil"));
        assert_eq!(outcome.transcript.len(), 4);
        assert_eq!(outcome.transcript[1], INSPECTOR_REJECTED);

        let critiques: Vec<_> = conv
            .messages()
            .iter()
            .filter(|m| m.content == BUTTER_CRITIQUE)
            .collect();
        assert_eq!(critiques.len(), 1);
        assert_eq!(critiques[0].role, Role::User);

        // Second chef call saw the first attempt and the critique.
        let retry = provider.request(2);
        assert_eq!(retry.model, "chef");
        let contents: Vec<&str> = retry.messages.iter().map(|m| m.content.as_str()).collect();
        assert!(contents.contains(&"**Breakfast Chef:**\nToast with butter"));
        assert_eq!(*contents.last().unwrap(), BUTTER_CRITIQUE);
    }

    #[tokio::test]
    async fn ceiling_ends_with_revision_exhausted() {
        let (provider, llm, revision) = setup(
            &["butter 1", "CONTAINS_BUTTER", "butter 2", "CONTAINS_BUTTER"],
            2,
        );
        let mut conv = user_turn("buttery toast");

        let err = revision
            .run(&llm, &chef(), ActiveSpecialist::Chef(MealLabel::Breakfast), &mut conv)
            .await
            .unwrap_err();

        match err {
            Error::RevisionExhausted { specialist, attempts } => {
                assert_eq!(specialist, "Breakfast Chef");
                assert_eq!(attempts, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(provider.call_count(), 4);
        // Only the rejection that led to a retry left a critique behind.
        let critiques = conv
            .messages()
            .iter()
            .filter(|m| m.content == BUTTER_CRITIQUE)
            .count();
        assert_eq!(critiques, 1);
    }

    #[tokio::test]
    async fn general_chat_skips_inspection() {
        let (provider, llm, revision) = setup(&["Hello there"], 3);
        let general = Specialist::new("router", "You are a helpful assistant.", ContextScope::FullHistory);
        let mut conv = user_turn("hi");

        let outcome = revision
            .run(&llm, &general, ActiveSpecialist::GeneralChat, &mut conv)
            .await
            .unwrap();
        assert_eq!(outcome.accepted, "Hello there");
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn zero_ceiling_still_allows_one_attempt() {
        let provider = Arc::new(SequentialMockProvider::texts(&[]));
        let llm = LlmClient::new(provider);
        let revision = RevisionLoop::new(Classifier::new(llm, "inspector"), 0);
        assert_eq!(revision.max_attempts(), 1);
    }

    #[test]
    fn active_specialist_from_label() {
        assert_eq!(
            ActiveSpecialist::for_label(MealLabel::Other),
            ActiveSpecialist::GeneralChat
        );
        assert!(ActiveSpecialist::for_label(MealLabel::Dinner).is_inspected());
        assert!(!ActiveSpecialist::GeneralChat.is_inspected());
    }
}
