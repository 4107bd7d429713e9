//! Error taxonomy for completion calls.
//!
//! Each variant is a distinct failure kind the orchestrator branches on:
//! - `Service`: the remote service rejected the request or errored
//! - `EmptyReply`: transport-level success with no usable content
//! - `Transport`: network-level failure before any service response

use std::fmt;

/// Errors from completion gateway operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The completion service rejected the request or errored. Covers auth
    /// failure, rate limiting, malformed requests, undecodable response
    /// bodies, and timeout expiry.
    Service {
        /// HTTP status, when the service responded at all.
        status: Option<u16>,
        /// Service-reported or classified reason.
        reason: String,
    },
    /// The call succeeded transport-wise but produced no usable content.
    EmptyReply,
    /// Network-level failure before any service response.
    Transport {
        /// The underlying transport failure.
        reason: String,
    },
}

impl CompletionError {
    /// Short stable label for the failure kind, for structured logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Service { .. } => "service",
            Self::EmptyReply => "empty_reply",
            Self::Transport { .. } => "transport",
        }
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service {
                status: Some(status),
                reason,
            } => {
                write!(f, "completion service error (status {status}): {reason}")
            }
            Self::Service {
                status: None,
                reason,
            } => {
                write!(f, "completion service error: {reason}")
            }
            Self::EmptyReply => write!(f, "completion service returned no usable content"),
            Self::Transport { reason } => {
                write!(f, "transport failure before service response: {reason}")
            }
        }
    }
}

impl std::error::Error for CompletionError {}
