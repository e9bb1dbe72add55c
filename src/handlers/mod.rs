//! Bot handlers module
//!
//! This module contains the turn handler that implements the bot's behavior
//! and the Telegram adapter that feeds it.

pub mod telegram;
pub mod turn;

pub use telegram::TelegramAdapter;
pub use turn::EchoWithCounterBot;
