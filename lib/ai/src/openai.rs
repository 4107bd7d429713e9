//! OpenAI-compatible completion backend.
//!
//! Speaks the `/chat/completions` wire format over HTTP. The system directive
//! is sent as the leading `system` message, followed by the windowed history.

use crate::backend::{
    CompletionBackend, CompletionMessage, CompletionReply, CompletionRequest, MessageRole,
    TokenUsage,
};
use crate::error::CompletionError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Backend for OpenAI-compatible chat-completion endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiBackend {
    /// Creates a backend against the default OpenAI endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Points the backend at a different OpenAI-compatible endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn wire_request(request: &CompletionRequest) -> WireRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: "system".to_string(),
            content: Some(request.directive.clone()),
        });
        messages.extend(request.messages.iter().map(WireMessage::from));

        WireRequest {
            model: request.options.model.clone(),
            messages,
            temperature: Some(request.options.temperature),
            max_tokens: Some(request.options.max_output_tokens),
            stream: false,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionReply, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::wire_request(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(request.options.timeout)
            .json(&body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(CompletionError::Service {
                status: Some(status.as_u16()),
                reason,
            });
        }

        let wire: WireResponse =
            response
                .json()
                .await
                .map_err(|e| CompletionError::Service {
                    status: None,
                    reason: format!("undecodable response body: {e}"),
                })?;

        reply_from_wire(wire)
    }
}

/// Classifies a send-stage failure.
///
/// Timeout expiry counts as a service failure; anything that failed before a
/// service response is a transport failure.
fn classify_send_error(error: reqwest::Error) -> CompletionError {
    if error.is_timeout() {
        CompletionError::Service {
            status: None,
            reason: "request timed out".to_string(),
        }
    } else {
        CompletionError::Transport {
            reason: error.to_string(),
        }
    }
}

/// Converts a decoded wire response into a reply, enforcing the non-empty
/// content guarantee.
fn reply_from_wire(wire: WireResponse) -> Result<CompletionReply, CompletionError> {
    let choice = wire
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::EmptyReply)?;

    let content = choice.message.content.unwrap_or_default();
    if content.trim().is_empty() {
        return Err(CompletionError::EmptyReply);
    }

    let usage = wire
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    Ok(CompletionReply {
        content,
        model: wire.model,
        usage,
    })
}

// Wire types for the chat-completions format.

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl From<&CompletionMessage> for WireMessage {
    fn from(message: &CompletionMessage) -> Self {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: Some(message.content.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
