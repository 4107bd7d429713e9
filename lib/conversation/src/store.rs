//! Per-conversation turn log storage.
//!
//! The backing log for each conversation grows monotonically by append; only
//! reads are bounded. An unknown conversation reads as an empty log, never an
//! error.

use crate::turn::Turn;
use careline_core::ConversationId;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store of per-conversation turn logs.
///
/// Mutation is scoped to a single conversation's log, so distinct
/// conversations never observe each other's turns. The lock is held only for
/// the duration of the map/vector operation, never across an await point.
#[derive(Debug, Default)]
pub struct TurnStore {
    logs: RwLock<HashMap<ConversationId, Vec<Turn>>>,
}

impl TurnStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to the conversation's log, creating the log on first use.
    pub fn append(&self, conversation: ConversationId, turn: Turn) {
        let mut logs = self.logs.write().expect("turn store lock poisoned");
        logs.entry(conversation).or_default().push(turn);
    }

    /// Returns the last `n` turns for the conversation in original order.
    ///
    /// Returns fewer turns if the log is shorter, and an empty window for an
    /// unknown conversation. Does not mutate the log.
    #[must_use]
    pub fn recent_window(&self, conversation: ConversationId, n: usize) -> Vec<Turn> {
        let logs = self.logs.read().expect("turn store lock poisoned");
        match logs.get(&conversation) {
            Some(log) => {
                let start = log.len().saturating_sub(n);
                log[start..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Returns the backing log length; zero for an unknown conversation.
    #[must_use]
    pub fn len(&self, conversation: ConversationId) -> usize {
        let logs = self.logs.read().expect("turn store lock poisoned");
        logs.get(&conversation).map_or(0, Vec::len)
    }

    /// Returns the number of conversations with at least one recorded turn.
    #[must_use]
    pub fn conversation_count(&self) -> usize {
        let logs = self.logs.read().expect("turn store lock poisoned");
        logs.len()
    }
}
