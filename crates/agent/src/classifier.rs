//! Classifier step: one completion constrained to a closed label set.
//!
//! The model's raw answer is upper-cased and scanned for each label keyword
//! in a fixed priority order. The first keyword found wins; if none is
//! found the label set's default is used. A fallback is never an error.

use std::fmt::Debug;
use std::marker::PhantomData;

use agentwire_core::message::Message;
use agentwire_core::Result;
use tracing::debug;

use crate::llm::LlmClient;

/// A closed set of dispatch labels.
pub trait DispatchLabel: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Labels tried in order; the default label is not listed.
    const PRIORITY: &'static [Self];

    /// Chosen when no keyword matches.
    const DEFAULT: Self;

    /// The keyword the model is told to answer with.
    fn keyword(self) -> &'static str;

    /// The fixed system instruction that enumerates the labels.
    fn instruction() -> &'static str;
}

/// Map a raw model answer onto a label.
pub fn normalize<L: DispatchLabel>(raw: &str) -> L {
    let answer = raw.trim().to_uppercase();
    match L::PRIORITY
        .iter()
        .copied()
        .find(|label| answer.contains(label.keyword()))
    {
        Some(label) => label,
        None => {
            debug!(answer = %raw.trim(), default = ?L::DEFAULT, "No label matched; using default");
            L::DEFAULT
        }
    }
}

/// Classifies one piece of text into `L` with a single completion call.
pub struct Classifier<L> {
    llm: LlmClient,
    model: String,
    _label: PhantomData<L>,
}

impl<L: DispatchLabel> Classifier<L> {
    pub fn new(llm: LlmClient, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            _label: PhantomData,
        }
    }

    pub async fn classify(&self, input: &str) -> Result<L> {
        let messages = vec![Message::system(L::instruction()), Message::user(input)];
        let reply = self.llm.complete(&self.model, messages).await?;
        let label = normalize::<L>(&reply.content);
        debug!(label = ?label, raw = %reply.content.trim(), "Classified");
        Ok(label)
    }
}
