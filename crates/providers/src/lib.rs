//! Completion API clients for agentwire.
//!
//! All providers implement the `agentwire_core::Provider` trait.
//! The router builds the configured provider once at startup.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_from_config};
