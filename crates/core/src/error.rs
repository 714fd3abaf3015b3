//! Error types for the agentwire domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for every pipeline step.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Conversation invariants ---
    #[error("Invalid conversation state: {0}")]
    InvalidConversation(String),

    // --- Revision loop ---
    #[error("Revision exhausted: {specialist} was rejected {attempts} times in a row")]
    RevisionExhausted { specialist: String, attempts: u32 },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// `retry_after_secs` comes from the `Retry-After` header when the
    /// provider sends one.
    #[error("Rate limited by provider{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed structured output for '{schema}': {reason}")]
    MalformedOutput { schema: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name} - {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs
        .map(|secs| format!(", retry after {secs}s"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn rate_limit_mentions_delay_only_when_known() {
        let known = ProviderError::RateLimited {
            retry_after_secs: Some(20),
        };
        assert_eq!(known.to_string(), "Rate limited by provider, retry after 20s");

        let unknown = ProviderError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(unknown.to_string(), "Rate limited by provider");
    }

    #[test]
    fn revision_exhausted_names_specialist() {
        let err = Error::RevisionExhausted {
            specialist: "breakfast_chef".into(),
            attempts: 3,
        };
        let text = err.to_string();
        assert!(text.contains("breakfast_chef"));
        assert!(text.contains('3'));
    }
}
