//! Pipeline steps and the interactive session for agentwire.
//!
//! A turn flows through a small graph of steps that all share one
//! append-only [`Conversation`](agentwire_core::Conversation):
//!
//! 1. **Classify** the current user turn into a closed label set
//! 2. **Dispatch** to the specialist for that label
//! 3. **Revise** (no-butter pipeline): inspect the output and, on a
//!    negative verdict, append a critique and ask the same specialist again
//! 4. **Act** (email pipeline): run the mail tools the model asked for and
//!    show their results
//!
//! The session reads one line at a time and stops on a quit token, at end
//! of input, or when a step fails.

pub mod classifier;
pub mod labels;
pub mod llm;
pub mod pipelines;
pub mod revision;
pub mod session;
pub mod specialist;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use classifier::{normalize, Classifier, DispatchLabel};
pub use labels::{InspectionVerdict, MealLabel, RecipeIntent};
pub use llm::LlmClient;
pub use pipelines::{build, Pipeline, PipelineKind};
pub use revision::{ActiveSpecialist, RevisionLoop, RevisionOutcome, RevisionState};
pub use session::{parse_input, Input, Session, SessionEnd};
pub use specialist::{ChefResponse, ContextScope, MealReply, Specialist};
