//! User-facing fallback replies for gateway failures.

use careline_ai::CompletionError;

/// Fixed fallback texts, selected by failure kind.
///
/// Service and transport failures read as connectivity trouble to the user;
/// an empty reply gets the generic apology.
#[derive(Debug, Clone)]
pub struct FallbackMessages {
    /// Reply for service and transport failures.
    pub connectivity: String,
    /// Reply for empty replies and anything else.
    pub generic: String,
}

impl Default for FallbackMessages {
    fn default() -> Self {
        Self {
            connectivity: "I'm having trouble connecting right now. Please try again in a moment."
                .to_string(),
            generic: "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl FallbackMessages {
    /// Selects the reply for a classified gateway failure.
    #[must_use]
    pub fn for_error(&self, error: &CompletionError) -> &str {
        match error {
            CompletionError::Service { .. } | CompletionError::Transport { .. } => {
                &self.connectivity
            }
            CompletionError::EmptyReply => &self.generic,
        }
    }
}
