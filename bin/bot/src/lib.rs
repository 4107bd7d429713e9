//! Transport and process wiring for the careline bot.
//!
//! Everything here is thin plumbing around the dialogue orchestrator:
//! environment configuration, the Telegram long-polling client, and the
//! update dispatch loop.

pub mod bot;
pub mod config;
pub mod telegram;

pub use bot::Bot;
pub use config::BotConfig;
pub use telegram::TelegramClient;
