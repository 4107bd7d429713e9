//! Core domain types and utilities for careline.
//!
//! This crate provides the foundational identifier types and error handling
//! shared by the conversation and dialogue crates and the bot binary.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ConversationId, TurnId};
