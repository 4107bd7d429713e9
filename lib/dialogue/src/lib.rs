//! Dialogue orchestration for careline.
//!
//! This crate provides:
//!
//! - **Dialogue Orchestrator**: the per-message append → window → call →
//!   append-or-fallback state machine
//! - **Fallback Messages**: fixed user-facing replies per failure kind
//! - **Default System Directive**: the physician-assistant persona text

pub mod directive;
pub mod fallback;
pub mod orchestrator;

pub use directive::DEFAULT_SYSTEM_DIRECTIVE;
pub use fallback::FallbackMessages;
pub use orchestrator::{DEFAULT_WINDOW_SIZE, DialogueOrchestrator};
