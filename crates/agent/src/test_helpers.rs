//! Shared test helpers for step and pipeline tests.

use agentwire_core::error::ProviderError;
use agentwire_core::message::{Message, MessageToolCall};
use agentwire_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Mutex;

type Scripted = Result<ProviderResponse, ProviderError>;

/// A mock provider that returns a sequence of scripted responses and
/// records every request it receives.
///
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Vec<Scripted>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// One plain text reply per call, in order.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(make_text_response(t))).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The `index`-th request received.
    pub fn request(&self, index: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        if index >= self.responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{index}, have {})",
                self.responses.len()
            );
        }
        requests.push(request);
        self.responses[index].clone()
    }
}

/// Create a simple text response (no tool calls).
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Create a response with tool calls and optional text content.
pub fn make_tool_call_response(tool_calls: Vec<MessageToolCall>, text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text).with_tool_calls(tool_calls),
        usage: None,
        model: "mock-model".into(),
    }
}

/// Helper to create a tool call.
pub fn make_tool_call(name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: serde_json::to_string(&args).unwrap(),
    }
}

/// A well-formed `ChefResponse` JSON body.
pub fn chef_json(recipe_name: &str, ingredients: &[&str]) -> String {
    serde_json::json!({
        "greeting": "Hi, I'm your chef.",
        "recipe_name": recipe_name,
        "ingredients": ingredients,
        "instructions": ["Mix everything", "Cook until golden"],
        "energy_level": "High"
    })
    .to_string()
}
