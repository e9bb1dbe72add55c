//! Bot state accessor registry
//!
//! Built once at startup and passed to turn handling. Holds the conversation
//! and user state containers plus the typed accessors the bot uses for its
//! turn counter and welcome flag.

use std::sync::{Arc, OnceLock};
use tracing::{debug, info};
use crate::models::{CounterState, WelcomeUserState};
use crate::utils::errors::{BotError, Result};
use super::accessor::StatePropertyAccessor;
use super::bot_state::{ConversationState, UserState};

/// Shared accessors for conversation and user state.
///
/// The containers are fixed at construction. The two accessor slots can be
/// filled exactly once, either by the builder or during application wiring.
#[derive(Debug)]
pub struct BotAccessors {
    conversation_state: Arc<ConversationState>,
    user_state: Arc<UserState>,
    counter_state: OnceLock<Arc<StatePropertyAccessor<CounterState>>>,
    welcome_user_state: OnceLock<Arc<StatePropertyAccessor<WelcomeUserState>>>,
}

impl BotAccessors {
    /// Accessor name for the conversation turn counter. Must be unique per container.
    pub const COUNTER_STATE_NAME: &'static str = "BotAccessors.CounterState";

    /// Accessor name for the user welcome flag. Must be unique per container.
    pub const WELCOME_USER_NAME: &'static str = "BotAccessors.WelcomeUserState";

    /// Create a registry with empty accessor slots.
    ///
    /// Fails with [`BotError::MissingDependency`] if either container is absent.
    pub fn new(
        conversation_state: Option<Arc<ConversationState>>,
        user_state: Option<Arc<UserState>>,
    ) -> Result<Self> {
        let mut builder = Self::builder();
        builder.conversation_state = conversation_state;
        builder.user_state = user_state;
        builder.build()
    }

    pub fn builder() -> BotAccessorsBuilder {
        BotAccessorsBuilder::default()
    }

    pub fn counter_state_name() -> &'static str {
        Self::COUNTER_STATE_NAME
    }

    pub fn welcome_user_name() -> &'static str {
        Self::WELCOME_USER_NAME
    }

    /// Accessor for the conversation turn counter
    pub fn counter_state(&self) -> Result<&Arc<StatePropertyAccessor<CounterState>>> {
        self.counter_state.get().ok_or(BotError::AccessorNotInitialized {
            name: Self::COUNTER_STATE_NAME,
        })
    }

    /// Fill the counter accessor slot. Fails if it was already filled.
    pub fn set_counter_state(&self, accessor: Arc<StatePropertyAccessor<CounterState>>) -> Result<()> {
        self.counter_state.set(accessor).map_err(|_| BotError::AccessorAlreadySet {
            name: Self::COUNTER_STATE_NAME,
        })?;
        debug!(name = Self::COUNTER_STATE_NAME, "Accessor set");
        Ok(())
    }

    /// Accessor for the user welcome flag
    pub fn welcome_user_state(&self) -> Result<&Arc<StatePropertyAccessor<WelcomeUserState>>> {
        self.welcome_user_state.get().ok_or(BotError::AccessorNotInitialized {
            name: Self::WELCOME_USER_NAME,
        })
    }

    /// Fill the welcome accessor slot. Fails if it was already filled.
    pub fn set_welcome_user_state(
        &self,
        accessor: Arc<StatePropertyAccessor<WelcomeUserState>>,
    ) -> Result<()> {
        self.welcome_user_state.set(accessor).map_err(|_| BotError::AccessorAlreadySet {
            name: Self::WELCOME_USER_NAME,
        })?;
        debug!(name = Self::WELCOME_USER_NAME, "Accessor set");
        Ok(())
    }

    pub fn conversation_state(&self) -> &Arc<ConversationState> {
        &self.conversation_state
    }

    pub fn user_state(&self) -> &Arc<UserState> {
        &self.user_state
    }
}

/// Builder for [`BotAccessors`]
#[derive(Debug, Default)]
pub struct BotAccessorsBuilder {
    conversation_state: Option<Arc<ConversationState>>,
    user_state: Option<Arc<UserState>>,
    create_accessors: bool,
}

impl BotAccessorsBuilder {
    pub fn conversation_state(mut self, state: Arc<ConversationState>) -> Self {
        self.conversation_state = Some(state);
        self
    }

    pub fn user_state(mut self, state: Arc<UserState>) -> Self {
        self.user_state = Some(state);
        self
    }

    /// Create both accessors from the containers under their fixed names
    pub fn with_default_accessors(mut self) -> Self {
        self.create_accessors = true;
        self
    }

    pub fn build(self) -> Result<BotAccessors> {
        let conversation_state = self.conversation_state.ok_or(BotError::MissingDependency {
            name: "conversation_state",
        })?;
        let user_state = self.user_state.ok_or(BotError::MissingDependency {
            name: "user_state",
        })?;

        let accessors = BotAccessors {
            conversation_state,
            user_state,
            counter_state: OnceLock::new(),
            welcome_user_state: OnceLock::new(),
        };

        if self.create_accessors {
            let counter = accessors
                .conversation_state
                .create_property::<CounterState>(BotAccessors::COUNTER_STATE_NAME);
            let welcome = accessors
                .user_state
                .create_property::<WelcomeUserState>(BotAccessors::WELCOME_USER_NAME);

            accessors.set_counter_state(Arc::new(counter))?;
            accessors.set_welcome_user_state(Arc::new(welcome))?;
        }

        info!(accessors_created = self.create_accessors, "Bot accessors built");
        Ok(accessors)
    }
}
