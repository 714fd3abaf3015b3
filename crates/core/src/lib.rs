//! # agentwire Core
//!
//! Domain types, traits, and error definitions shared by every agentwire
//! pipeline. This crate has **no framework dependencies**: it defines the
//! model that the provider, tool, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators (the completion API and the tools) are
//! traits here. Implementations live in their own crates, so every pipeline
//! can be driven by a scripted provider or a stub mail transport in tests.

pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Conversation, ConversationId, Message, Role};
pub use provider::{OutputSchema, Provider, ProviderRequest, ProviderResponse};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
