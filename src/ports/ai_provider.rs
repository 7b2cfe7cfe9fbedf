//! AI Provider Port - Text completion as seen by the analysis pipeline.
//!
//! A completion is one prompt in, one block of raw model text out. Both
//! analysis passes send their whole instruction (transcript or prior analysis
//! included) as a single system prompt; there is no chat history.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider able to complete a single prompt.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Sends the prompt and waits for the full completion. Never retries.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    fn provider_info(&self) -> ProviderInfo;
}

/// Which analysis pass a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Analyze,
    Insight,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Analyze => write!(f, "analyze"),
            Operation::Insight => write!(f, "insight"),
        }
    }
}

/// Correlates log lines for one completion.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub operation: Operation,
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(operation: Operation, trace_id: impl Into<String>) -> Self {
        Self {
            operation,
            trace_id: trace_id.into(),
        }
    }

    /// Metadata with a fresh v4 trace id.
    pub fn generate(operation: Operation) -> Self {
        Self::new(operation, uuid::Uuid::new_v4().to_string())
    }
}

/// One completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full instruction text, sent with the system role.
    pub prompt: String,
    pub temperature: f32,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Builds a request for `operation` with a generated trace id.
    pub fn new(operation: Operation, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            metadata: RequestMetadata::generate(operation),
        }
    }

    /// Replaces the generated trace id.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.metadata.trace_id = trace_id.into();
        self
    }
}

/// Raw model output plus accounting.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Model text, unsanitized.
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: FinishReason,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    /// Output was cut at the token limit; the JSON is likely truncated.
    Length,
    ContentFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Failures of the completion call itself.
///
/// All of these surface to users as transport failures; none is retried.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    /// The provider's response envelope was unreadable (not the model text).
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_prompt_and_generated_trace_id() {
        let a = CompletionRequest::new(Operation::Analyze, "분석하세요", 0.3);
        let b = CompletionRequest::new(Operation::Analyze, "분석하세요", 0.3);

        assert_eq!(a.prompt, "분석하세요");
        assert_eq!(a.temperature, 0.3);
        assert_eq!(a.metadata.operation, Operation::Analyze);
        assert_ne!(a.metadata.trace_id, b.metadata.trace_id);
    }

    #[test]
    fn trace_id_can_be_pinned() {
        let request =
            CompletionRequest::new(Operation::Insight, "p", 0.4).with_trace_id("trace-123");
        assert_eq!(request.metadata.trace_id, "trace-123");
    }

    #[test]
    fn token_usage_sums_total() {
        assert_eq!(TokenUsage::new(100, 50).total_tokens, 150);
    }

    #[test]
    fn operation_displays_lowercase() {
        assert_eq!(Operation::Analyze.to_string(), "analyze");
        assert_eq!(Operation::Insight.to_string(), "insight");
    }

    #[test]
    fn ai_error_messages() {
        assert_eq!(
            AIError::rate_limited(30).to_string(),
            "rate limited: retry after 30s"
        );
        assert_eq!(
            AIError::unavailable("overloaded").to_string(),
            "provider unavailable: overloaded"
        );
        assert_eq!(AIError::AuthenticationFailed.to_string(), "authentication failed");
    }
}
