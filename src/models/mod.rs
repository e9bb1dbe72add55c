//! Data models module
//!
//! This module contains the conversational activity model and the values
//! the bot keeps in conversation and user state.

pub mod activity;
pub mod counter;
pub mod welcome;

pub use activity::{Activity, ActivityType, ChannelAccount, ConversationAccount};
pub use counter::CounterState;
pub use welcome::WelcomeUserState;
