//! Dialogue turn orchestration.
//!
//! One pass per inbound message:
//!
//! 1. Reject messages with no text content (no-op, no reply)
//! 2. Record the user turn
//! 3. Read the bounded window, which ends with the just-recorded turn
//! 4. Invoke the completion gateway
//! 5. On success, record the assistant turn and return the reply
//! 6. On failure, record nothing and return the kind-appropriate fallback
//!
//! A failed call never records an assistant turn, so history never contains
//! a reply the model did not produce.

use crate::fallback::FallbackMessages;
use careline_ai::{
    CompletionBackend, CompletionMessage, CompletionOptions, CompletionRequest, MessageRole,
};
use careline_conversation::{Turn, TurnRole, TurnStore};
use careline_core::ConversationId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

/// Default number of turns visible to the model per call.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Orchestrates dialogue turns between the turn store and the completion
/// gateway.
///
/// Constructed once at startup and shared by reference across all
/// conversations. Whole turns are serialized per conversation: a concurrent
/// transport cannot interleave or lose turns for one chat, and distinct
/// conversations never contend.
pub struct DialogueOrchestrator {
    store: TurnStore,
    backend: Arc<dyn CompletionBackend>,
    directive: String,
    options: CompletionOptions,
    window_size: usize,
    fallbacks: FallbackMessages,
    turn_guards: Mutex<HashMap<ConversationId, Arc<AsyncMutex<()>>>>,
}

impl DialogueOrchestrator {
    /// Creates an orchestrator with an empty turn store.
    #[must_use]
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        directive: impl Into<String>,
        options: CompletionOptions,
    ) -> Self {
        Self {
            store: TurnStore::new(),
            backend,
            directive: directive.into(),
            options,
            window_size: DEFAULT_WINDOW_SIZE,
            fallbacks: FallbackMessages::default(),
            turn_guards: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the number of turns visible to the model per call.
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Replaces the fallback texts.
    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: FallbackMessages) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Read access to the turn store, for diagnostics and tests.
    #[must_use]
    pub fn store(&self) -> &TurnStore {
        &self.store
    }

    /// Handles one inbound message and returns the outbound reply.
    ///
    /// Returns `None` when the message carries no text content. Gateway
    /// failures are converted to fallback replies and never propagate to the
    /// transport.
    pub async fn handle_message(
        &self,
        conversation: ConversationId,
        text: &str,
    ) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        let guard = self.turn_guard(conversation);
        let _serialized = guard.lock().await;

        self.store.append(conversation, Turn::user(text));

        let window = self.store.recent_window(conversation, self.window_size);
        let messages = window.iter().map(completion_message).collect();
        let request =
            CompletionRequest::new(self.directive.clone(), self.options.clone())
                .with_messages(messages);

        match self.backend.complete(&request).await {
            Ok(reply) => {
                self.store
                    .append(conversation, Turn::assistant(&reply.content));
                tracing::info!(conversation = %conversation, "delivered model reply");
                Some(reply.content)
            }
            Err(error) => {
                tracing::error!(
                    conversation = %conversation,
                    kind = error.kind(),
                    error = %error,
                    "completion failed, substituting fallback reply"
                );
                Some(self.fallbacks.for_error(&error).to_string())
            }
        }
    }

    fn turn_guard(&self, conversation: ConversationId) -> Arc<AsyncMutex<()>> {
        let mut guards = self.turn_guards.lock().expect("guard map lock poisoned");
        guards.entry(conversation).or_default().clone()
    }
}

fn completion_message(turn: &Turn) -> CompletionMessage {
    let role = match turn.role {
        TurnRole::User => MessageRole::User,
        TurnRole::Assistant => MessageRole::Assistant,
    };
    CompletionMessage {
        role,
        content: turn.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use careline_ai::{CompletionError, CompletionReply, TokenUsage};

    enum Outcome {
        Reply(String),
        Echo,
        Fail(CompletionError),
    }

    struct MockBackend {
        requests: Mutex<Vec<CompletionRequest>>,
        outcome: Outcome,
    }

    impl MockBackend {
        fn replying(text: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                outcome: Outcome::Reply(text.into()),
            })
        }

        fn echoing() -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                outcome: Outcome::Echo,
            })
        }

        fn failing(error: CompletionError) -> Arc<Self> {
            Arc::new(Self {
                requests: Mutex::new(Vec::new()),
                outcome: Outcome::Fail(error),
            })
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn last_request(&self) -> CompletionRequest {
            self.requests
                .lock()
                .unwrap()
                .last()
                .cloned()
                .expect("no request recorded")
        }
    }

    fn reply(content: String) -> CompletionReply {
        CompletionReply {
            content,
            model: "mock".to_string(),
            usage: TokenUsage::default(),
        }
    }

    #[async_trait]
    impl CompletionBackend for MockBackend {
        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionReply, CompletionError> {
            self.requests.lock().unwrap().push(request.clone());
            match &self.outcome {
                Outcome::Reply(text) => Ok(reply(text.clone())),
                Outcome::Echo => {
                    let last = request
                        .messages
                        .last()
                        .map(|m| m.content.clone())
                        .unwrap_or_default();
                    Ok(reply(format!("echo: {last}")))
                }
                Outcome::Fail(error) => Err(error.clone()),
            }
        }
    }

    fn conv(id: i64) -> ConversationId {
        ConversationId::from_chat(id)
    }

    fn orchestrator(backend: Arc<MockBackend>) -> DialogueOrchestrator {
        DialogueOrchestrator::new(backend, "directive", CompletionOptions::default())
    }

    #[tokio::test]
    async fn message_without_text_is_a_no_op() {
        let backend = MockBackend::replying("unused");
        let orch = orchestrator(backend.clone());

        assert_eq!(orch.handle_message(conv(1), "").await, None);
        assert_eq!(orch.handle_message(conv(1), "   \n\t").await, None);

        assert_eq!(backend.request_count(), 0);
        assert_eq!(orch.store().len(conv(1)), 0);
    }

    #[tokio::test]
    async fn success_appends_exactly_one_assistant_turn() {
        let backend = MockBackend::replying("Recorded.");
        let orch = orchestrator(backend.clone());

        let out = orch.handle_message(conv(1), "My BP is 130/85").await;
        assert_eq!(out.as_deref(), Some("Recorded."));

        let log = orch.store().recent_window(conv(1), 10);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].role, TurnRole::User);
        assert_eq!(log[0].content, "My BP is 130/85");
        assert_eq!(log[1].role, TurnRole::Assistant);
        assert_eq!(log[1].content, "Recorded.");
    }

    #[tokio::test]
    async fn first_message_yields_single_element_window() {
        let backend = MockBackend::echoing();
        let orch = orchestrator(backend.clone());

        orch.handle_message(conv(1), "hello").await;

        let request = backend.last_request();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn window_is_bounded_and_ends_with_current_turn() {
        let backend = MockBackend::echoing();
        let orch = orchestrator(backend.clone()).with_window_size(3);

        for i in 1..=5 {
            orch.handle_message(conv(1), &format!("m{i}")).await;
        }

        let request = backend.last_request();
        assert_eq!(request.messages.len(), 3);

        let roles: Vec<MessageRole> = request.messages.iter().map(|m| m.role).collect();
        let contents: Vec<&str> = request.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
        assert_eq!(contents, vec!["m4", "echo: m4", "m5"]);
    }

    #[tokio::test]
    async fn backing_log_is_never_truncated_by_windowing() {
        let backend = MockBackend::echoing();
        let orch = orchestrator(backend.clone()).with_window_size(2);

        for i in 1..=4 {
            orch.handle_message(conv(1), &format!("m{i}")).await;
        }

        // 4 user turns + 4 assistant turns, window bounding notwithstanding.
        assert_eq!(orch.store().len(conv(1)), 8);
        let full = orch.store().recent_window(conv(1), 8);
        assert_eq!(full[0].content, "m1");
    }

    #[tokio::test]
    async fn service_failure_substitutes_connectivity_fallback() {
        let backend = MockBackend::failing(CompletionError::Service {
            status: None,
            reason: "request timed out".to_string(),
        });
        let orch = orchestrator(backend.clone());

        let out = orch.handle_message(conv(1), "My BP is 150/90").await;
        assert_eq!(
            out.as_deref(),
            Some("I'm having trouble connecting right now. Please try again in a moment.")
        );

        // Only the user turn was recorded; no phantom assistant turn.
        assert_eq!(orch.store().len(conv(1)), 1);
        let log = orch.store().recent_window(conv(1), 10);
        assert_eq!(log[0].role, TurnRole::User);
    }

    #[tokio::test]
    async fn transport_failure_substitutes_connectivity_fallback() {
        let backend = MockBackend::failing(CompletionError::Transport {
            reason: "connection refused".to_string(),
        });
        let orch = orchestrator(backend.clone());

        let out = orch.handle_message(conv(1), "hello").await;
        assert_eq!(
            out.as_deref(),
            Some("I'm having trouble connecting right now. Please try again in a moment.")
        );
        assert_eq!(orch.store().len(conv(1)), 1);
    }

    #[tokio::test]
    async fn empty_reply_substitutes_generic_fallback() {
        let backend = MockBackend::failing(CompletionError::EmptyReply);
        let orch = orchestrator(backend.clone());

        let out = orch.handle_message(conv(1), "hello").await;
        assert_eq!(out.as_deref(), Some("Something went wrong. Please try again."));
        assert_eq!(orch.store().len(conv(1)), 1);
    }

    #[tokio::test]
    async fn failure_then_success_keeps_history_consistent() {
        let failing = MockBackend::failing(CompletionError::EmptyReply);
        let orch = orchestrator(failing);

        orch.handle_message(conv(1), "first").await;
        assert_eq!(orch.store().len(conv(1)), 1);

        // The fallback reply was never recorded as an assistant turn, so the
        // next window replays only what the model actually saw and said.
        let window = orch.store().recent_window(conv(1), 10);
        assert!(window.iter().all(|t| t.role == TurnRole::User));
    }

    #[tokio::test]
    async fn conversations_never_observe_each_other() {
        let backend = MockBackend::echoing();
        let orch = orchestrator(backend.clone());

        orch.handle_message(conv(1), "from alice").await;
        orch.handle_message(conv(2), "from bob").await;

        assert_eq!(orch.store().len(conv(1)), 2);
        assert_eq!(orch.store().len(conv(2)), 2);

        let alice = orch.store().recent_window(conv(1), 10);
        assert!(alice.iter().all(|t| !t.content.contains("bob")));

        let request = backend.last_request();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "from bob");
    }

    #[tokio::test]
    async fn directive_and_options_are_fixed_per_call() {
        let backend = MockBackend::echoing();
        let options = CompletionOptions::default().with_model("gpt-4o-mini");
        let orch = DialogueOrchestrator::new(backend.clone(), "be brief", options);

        orch.handle_message(conv(1), "hello").await;

        let request = backend.last_request();
        assert_eq!(request.directive, "be brief");
        assert_eq!(request.options.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn reading_round_trip_is_delivered_verbatim() {
        let backend =
            MockBackend::replying("Your BP is 150/90 - elevated. Take your medication.");
        let orch = orchestrator(backend.clone());

        let out = orch.handle_message(conv(7), "My BP is 150/90").await;

        let request = backend.last_request();
        assert_eq!(
            request.messages.last().map(|m| m.content.as_str()),
            Some("My BP is 150/90")
        );
        assert_eq!(
            out.as_deref(),
            Some("Your BP is 150/90 - elevated. Take your medication.")
        );

        let log = orch.store().recent_window(conv(7), 10);
        assert_eq!(
            log.last().map(|t| t.content.as_str()),
            Some("Your BP is 150/90 - elevated. Take your medication.")
        );
    }

    #[tokio::test]
    async fn concurrent_messages_for_one_conversation_are_serialized() {
        let backend = MockBackend::echoing();
        let orch = Arc::new(orchestrator(backend.clone()));

        let a = tokio::spawn({
            let orch = Arc::clone(&orch);
            async move { orch.handle_message(conv(1), "one").await }
        });
        let b = tokio::spawn({
            let orch = Arc::clone(&orch);
            async move { orch.handle_message(conv(1), "two").await }
        });

        a.await.expect("task a").expect("reply a");
        b.await.expect("task b").expect("reply b");

        // Two full turns, never interleaved: user and assistant strictly
        // alternate regardless of task scheduling.
        let log = orch.store().recent_window(conv(1), 10);
        assert_eq!(log.len(), 4);
        let roles: Vec<TurnRole> = log.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                TurnRole::User,
                TurnRole::Assistant,
                TurnRole::User,
                TurnRole::Assistant
            ]
        );
    }
}
