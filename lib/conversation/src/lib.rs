//! Conversation state for careline.
//!
//! This crate provides:
//!
//! - **Turn**: one message exchanged, tagged by speaker role
//! - **Turn Store**: append-only per-conversation logs with bounded reads

pub mod store;
pub mod turn;

pub use store::TurnStore;
pub use turn::{Turn, TurnRole};
