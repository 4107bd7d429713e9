//! Update dispatch loop.
//!
//! Pulls updates off the Telegram long poll and hands each text message to
//! the dialogue orchestrator on its own task; the orchestrator serializes
//! turns per conversation. The `/start` and `/help` commands answer with a
//! static welcome and never touch the turn store or the gateway.

use crate::telegram::{TelegramClient, Update};
use careline_core::ConversationId;
use careline_dialogue::DialogueOrchestrator;
use std::sync::Arc;
use std::time::Duration;

/// Static welcome reply for `/start` and `/help`.
pub const WELCOME_MESSAGE: &str = "Hi! I'm your health assistant. 👋\n\n\
    You can share your blood pressure or blood sugar readings with me anytime, \
    and I'll help you track how you're doing. Just chat naturally!\n\n\
    Examples:\n\
    • My BP is 130/85\n\
    • Blood sugar 145 after lunch\n\
    • I'm not feeling well today";

const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// The long-polling bot.
pub struct Bot {
    telegram: TelegramClient,
    orchestrator: Arc<DialogueOrchestrator>,
}

impl Bot {
    /// Creates a bot over the given transport and orchestrator.
    #[must_use]
    pub fn new(telegram: TelegramClient, orchestrator: Arc<DialogueOrchestrator>) -> Self {
        Self {
            telegram,
            orchestrator,
        }
    }

    /// Runs the polling loop until the process is stopped.
    ///
    /// Poll failures are logged and retried after a short delay; per-message
    /// failures never terminate the loop.
    pub async fn run(&self) {
        let mut offset = match self.telegram.drop_pending_updates().await {
            Ok(offset) => {
                tracing::info!("dropped pending update backlog");
                offset
            }
            Err(error) => {
                tracing::warn!(error = %error, "failed to drop pending updates, starting anyway");
                None
            }
        };

        loop {
            match self.telegram.get_updates(offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        self.dispatch(update);
                    }
                }
                Err(error) => {
                    tracing::warn!(error = %error, "polling failed, retrying");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }

    /// Hands one update to its own task.
    fn dispatch(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            return;
        };

        let conversation = ConversationId::from_chat(message.chat.id);
        let telegram = self.telegram.clone();
        let orchestrator = Arc::clone(&self.orchestrator);

        tokio::spawn(async move {
            let reply = if let Some(command) = text.strip_prefix('/') {
                match command_reply(command) {
                    Some(reply) => {
                        tracing::info!(conversation = %conversation, "answered command");
                        Some(reply.to_string())
                    }
                    // Unknown commands are ignored, not relayed to the model.
                    None => None,
                }
            } else {
                orchestrator.handle_message(conversation, &text).await
            };

            let Some(reply) = reply else {
                return;
            };
            if let Err(error) = telegram.send_message(conversation.as_i64(), &reply).await {
                tracing::warn!(conversation = %conversation, error = %error, "failed to send reply");
            }
        });
    }
}

fn command_reply(command: &str) -> Option<&'static str> {
    match command.split_whitespace().next().unwrap_or(command) {
        "start" | "help" => Some(WELCOME_MESSAGE),
        _ => None,
    }
}
