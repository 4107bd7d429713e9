//! Completion gateway for careline.
//!
//! One network round trip per inbound message: build a request from the
//! system directive and the windowed history, call the backing completion
//! service, and classify any failure. No retries are performed here; a single
//! attempt either yields a non-empty reply or a classified error.

pub mod backend;
pub mod error;
pub mod openai;

pub use backend::{
    CompletionBackend, CompletionMessage, CompletionOptions, CompletionReply, CompletionRequest,
    MessageRole, TokenUsage,
};
pub use error::CompletionError;
pub use openai::OpenAiBackend;
