//! Echo Counter Bot
//!
//! A Telegram bot that echoes messages back with a per-conversation turn
//! counter and greets each user once. State lives in conversation- and
//! user-scoped containers reached through a shared accessor registry.

pub mod config;
pub mod handlers;
pub mod models;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{BotError, Result};

// Re-export main components for easy access
pub use handlers::{EchoWithCounterBot, TelegramAdapter};
pub use state::{BotAccessors, ConversationState, StateStorage, UserState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
