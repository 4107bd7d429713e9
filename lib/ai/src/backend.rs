//! Completion backend abstraction.
//!
//! Provides a unified interface over chat-completion providers. The dialogue
//! orchestrator only sees this trait; the concrete OpenAI-compatible client
//! lives in [`crate::openai`].

use crate::error::CompletionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System directive.
    System,
    /// User/human message.
    User,
    /// Assistant/AI message.
    Assistant,
}

/// A message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
}

impl CompletionMessage {
    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Fixed per-call options, established at startup and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Identifier of the backing model.
    pub model: String,
    /// Sampling randomness in [0, 1].
    pub temperature: f32,
    /// Upper bound on reply length in tokens.
    pub max_output_tokens: u32,
    /// Maximum wall-clock duration to await a response.
    pub timeout: Duration,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            max_output_tokens: 400,
            timeout: Duration::from_secs(30),
        }
    }
}

impl CompletionOptions {
    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the output token bound.
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Sets the call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A request to the completion service.
///
/// `messages` is the windowed conversation history; by construction it always
/// ends with the current user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The system directive sent with every call.
    pub directive: String,
    /// Windowed history, ending with the current user message.
    pub messages: Vec<CompletionMessage>,
    /// Per-call options.
    pub options: CompletionOptions,
}

impl CompletionRequest {
    /// Creates a request with an empty history.
    #[must_use]
    pub fn new(directive: impl Into<String>, options: CompletionOptions) -> Self {
        Self {
            directive: directive.into(),
            messages: Vec::new(),
            options,
        }
    }

    /// Sets the windowed history.
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<CompletionMessage>) -> Self {
        self.messages = messages;
        self
    }
}

/// A successful reply from the completion service.
///
/// `content` is guaranteed non-empty; an empty reply is reported as
/// [`CompletionError::EmptyReply`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionReply {
    /// The generated reply text.
    pub content: String,
    /// Model that generated the reply.
    pub model: String,
    /// Token usage statistics.
    pub usage: TokenUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens.
    pub input_tokens: u32,
    /// Number of output tokens.
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Returns the total number of tokens.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// Trait for completion backends.
///
/// Implementations perform exactly one external round trip per call and never
/// retry internally.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Requests a completion for the given request.
    ///
    /// # Errors
    ///
    /// Returns a [`CompletionError`] classifying the failure: the service
    /// rejected the call, the call produced no usable content, or the network
    /// failed before any service response.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionReply, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_defaults() {
        let options = CompletionOptions::default();
        assert_eq!(options.model, "gpt-4o");
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.max_output_tokens, 400);
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[test]
    fn options_builder() {
        let options = CompletionOptions::default()
            .with_model("gpt-4o-mini")
            .with_temperature(0.2)
            .with_max_output_tokens(200)
            .with_timeout(Duration::from_secs(10));

        assert_eq!(options.model, "gpt-4o-mini");
        assert_eq!(options.temperature, 0.2);
        assert_eq!(options.max_output_tokens, 200);
        assert_eq!(options.timeout, Duration::from_secs(10));
    }

    #[test]
    fn request_builder() {
        let request = CompletionRequest::new("You are a doctor.", CompletionOptions::default())
            .with_messages(vec![
                CompletionMessage::user("My BP is 130/85"),
                CompletionMessage::assistant("Recorded."),
                CompletionMessage::user("Thanks"),
            ]);

        assert_eq!(request.directive, "You are a doctor.");
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[2].role, MessageRole::User);
    }

    #[test]
    fn message_role_serde_is_lowercase() {
        let json = serde_json::to_string(&MessageRole::System).expect("serialize");
        assert_eq!(json, "\"system\"");
    }

    #[test]
    fn token_usage_total() {
        let usage = TokenUsage {
            input_tokens: 120,
            output_tokens: 40,
        };
        assert_eq!(usage.total(), 160);
    }
}
