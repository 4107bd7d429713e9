//! Minimal Telegram Bot API client.
//!
//! Long-polling `getUpdates` plus `sendMessage`, which is all the bot needs.
//! Wire structs cover only the fields the dispatch loop reads.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

/// Extra headroom over the long-poll window before the HTTP call is cut off.
const HTTP_TIMEOUT_MARGIN_SECS: u64 = 10;

/// Errors from Telegram transport operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelegramError {
    /// The Bot API answered with `ok: false`.
    Api { description: String },
    /// HTTP-level failure (network, timeout, undecodable body).
    Http { reason: String },
}

impl fmt::Display for TelegramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api { description } => write!(f, "telegram api error: {description}"),
            Self::Http { reason } => write!(f, "telegram http error: {reason}"),
        }
    }
}

impl std::error::Error for TelegramError {}

impl From<reqwest::Error> for TelegramError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http {
            reason: error.to_string(),
        }
    }
}

/// An update delivered by `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,
    /// The message payload, when the update carries one.
    pub message: Option<IncomingMessage>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    /// The chat the message arrived in.
    pub chat: Chat,
    /// Text content; absent for stickers, photos, and the like.
    pub text: Option<String>,
}

/// A Telegram chat.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat identifier; this is the conversation identity.
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesParams {
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    allowed_updates: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageParams<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Thin HTTP client for the Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    /// Creates a client for the given bot token.
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{API_BASE}/bot{token}"),
        }
    }

    /// Points the client at a different API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Long-polls for updates after `offset`, waiting up to `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns a [`TelegramError`] if the HTTP call fails or the Bot API
    /// reports a failure.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            timeout: timeout_secs,
            offset,
            allowed_updates: vec!["message".to_string()],
        };

        let response: ApiResponse<Vec<Update>> = self
            .client
            .post(format!("{}/getUpdates", self.base_url))
            .timeout(Duration::from_secs(timeout_secs + HTTP_TIMEOUT_MARGIN_SECS))
            .json(&params)
            .send()
            .await?
            .json()
            .await?;

        into_result(response)
    }

    /// Sends `text` to the chat verbatim.
    ///
    /// # Errors
    ///
    /// Returns a [`TelegramError`] if the HTTP call fails or the Bot API
    /// reports a failure.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let params = SendMessageParams { chat_id, text };

        let response: ApiResponse<serde_json::Value> = self
            .client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&params)
            .send()
            .await?
            .json()
            .await?;

        into_result(response).map(|_| ())
    }

    /// Discards the pending update backlog and returns the next poll offset.
    ///
    /// A fresh process should not replay messages queued while it was down.
    ///
    /// # Errors
    ///
    /// Returns a [`TelegramError`] if the HTTP call fails or the Bot API
    /// reports a failure.
    pub async fn drop_pending_updates(&self) -> Result<Option<i64>, TelegramError> {
        let pending = self.get_updates(Some(-1), 0).await?;
        Ok(pending.last().map(|u| u.update_id + 1))
    }
}

fn into_result<T>(response: ApiResponse<T>) -> Result<T, TelegramError> {
    if !response.ok {
        return Err(TelegramError::Api {
            description: response
                .description
                .unwrap_or_else(|| "no description".to_string()),
        });
    }
    response.result.ok_or_else(|| TelegramError::Api {
        description: "ok response without result".to_string(),
    })
}
