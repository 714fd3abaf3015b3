//! Thin wrapper over a [`Provider`] shared by every step of a pipeline.

use std::sync::Arc;

use agentwire_config::AppConfig;
use agentwire_core::error::ProviderError;
use agentwire_core::message::Message;
use agentwire_core::provider::{OutputSchema, Provider, ProviderRequest, ToolDefinition};
use agentwire_core::Result;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// The resolved provider plus the sampling settings every call uses.
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn Provider>,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.max_tokens)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn request(&self, model: &str, messages: Vec<Message>) -> ProviderRequest {
        ProviderRequest::new(model, messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }

    async fn send(&self, request: ProviderRequest) -> Result<Message> {
        debug!(
            provider = self.provider.name(),
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            structured = request.output_schema.is_some(),
            "Completion request"
        );

        match self.provider.complete(request).await {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    debug!(model = %response.model, tokens = usage.total_tokens, "Completion done");
                }
                Ok(response.message)
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Completion failed");
                Err(e.into())
            }
        }
    }

    /// Plain text completion.
    pub async fn complete(&self, model: &str, messages: Vec<Message>) -> Result<Message> {
        self.send(self.request(model, messages)).await
    }

    /// Completion that may answer with tool calls.
    pub async fn complete_with_tools(
        &self,
        model: &str,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
    ) -> Result<Message> {
        self.send(self.request(model, messages).with_tools(tools))
            .await
    }

    /// Schema-constrained completion, parsed into `T`.
    ///
    /// Returns the parsed value and the raw JSON it came from.
    pub async fn complete_structured<T: DeserializeOwned>(
        &self,
        model: &str,
        messages: Vec<Message>,
        schema: OutputSchema,
    ) -> Result<(T, serde_json::Value)> {
        let name = schema.name.clone();
        let message = self
            .send(self.request(model, messages).with_output_schema(schema))
            .await?;

        let malformed = |reason: String| ProviderError::MalformedOutput {
            schema: name.clone(),
            reason,
        };
        let raw: serde_json::Value =
            serde_json::from_str(message.content.trim()).map_err(|e| malformed(e.to_string()))?;
        let parsed = serde_json::from_value(raw.clone()).map_err(|e| malformed(e.to_string()))?;
        Ok((parsed, raw))
    }
}
