//! State management module
//!
//! This module handles conversation and user state: storage backends,
//! scoped state containers, typed property accessors and the accessor
//! registry handed to turn processing.

pub mod accessor;
pub mod accessors;
pub mod bot_state;
pub mod storage;
pub mod turn;

// Re-export commonly used state components
pub use accessor::StatePropertyAccessor;
pub use accessors::{BotAccessors, BotAccessorsBuilder};
pub use bot_state::{BotState, ConversationState, StateScope, UserState};
pub use storage::StateStorage;
pub use turn::{CachedBotState, TurnContext};
