//! Conversation- and user-scoped state containers
//!
//! A container owns no data itself. It derives a storage key from the turn's
//! activity, loads the JSON document under that key into the turn cache,
//! and writes it back at the end of the turn when it changed.

use std::ops::Deref;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use crate::utils::errors::{BotError, Result};
use crate::utils::logging::log_state_save;
use super::accessor::StatePropertyAccessor;
use super::storage::StateStorage;
use super::turn::{CachedBotState, TurnContext};

/// What a container's state is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateScope {
    Conversation,
    User,
}

impl StateScope {
    /// Name under which the container caches its document on a turn
    pub fn cache_name(&self) -> &'static str {
        match self {
            StateScope::Conversation => "ConversationState",
            StateScope::User => "UserState",
        }
    }

    /// Storage key for the activity of the current turn
    pub fn storage_key(&self, turn: &TurnContext) -> Result<String> {
        let activity = turn.activity();
        if activity.channel_id.is_empty() {
            return Err(BotError::InvalidInput("Activity is missing a channel id".to_string()));
        }

        match self {
            StateScope::Conversation => {
                let conversation_id = activity.conversation_id().ok_or_else(|| {
                    BotError::InvalidInput("Activity is missing a conversation id".to_string())
                })?;
                Ok(format!("{}/conversations/{}", activity.channel_id, conversation_id))
            }
            StateScope::User => {
                let user_id = activity.from_id().ok_or_else(|| {
                    BotError::InvalidInput("Activity is missing a sender id".to_string())
                })?;
                Ok(format!("{}/users/{}", activity.channel_id, user_id))
            }
        }
    }
}

/// State container bound to a scope and a storage backend
#[derive(Debug, Clone)]
pub struct BotState {
    scope: StateScope,
    storage: StateStorage,
}

impl BotState {
    pub fn new(scope: StateScope, storage: StateStorage) -> Self {
        Self { scope, storage }
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    /// Create a typed accessor for a property of this container
    pub fn create_property<T>(&self, name: &str) -> StatePropertyAccessor<T> {
        StatePropertyAccessor::new(name, self.clone())
    }

    /// Load the document for this turn into the turn cache.
    ///
    /// Already cached documents are kept unless `force` is set.
    pub async fn load(&self, turn: &mut TurnContext, force: bool) -> Result<()> {
        let cache_name = self.scope.cache_name();
        let storage_key = self.scope.storage_key(turn)?;

        let cached_matches = turn
            .cached_state(cache_name)
            .map_or(false, |cached| cached.storage_key == storage_key);
        if cached_matches && !force {
            return Ok(());
        }

        let mut items = self.storage.read(std::slice::from_ref(&storage_key)).await?;
        let state = match items.remove(&storage_key) {
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(BotError::InvalidInput(format!(
                    "State under '{}' is not an object: {}",
                    storage_key, other
                )))
            }
            None => Map::new(),
        };

        debug!(key = %storage_key, properties = state.len(), "State loaded");
        turn.insert_cached_state(cache_name, CachedBotState::loaded(storage_key, state));
        Ok(())
    }

    /// Persist the cached document if it changed, or unconditionally with `force`
    pub async fn save_changes(&self, turn: &mut TurnContext, force: bool) -> Result<()> {
        let cache_name = self.scope.cache_name();
        let Some(cached) = turn.cached_state_mut(cache_name) else {
            return Ok(());
        };

        let changed = cached.is_changed();
        if !force && !changed {
            return Ok(());
        }

        let mut changes = std::collections::HashMap::new();
        changes.insert(cached.storage_key.clone(), Value::Object(cached.state.clone()));

        match self.storage.write(changes).await {
            Ok(()) => {
                cached.mark_saved();
                log_state_save(&cached.storage_key, changed, true);
                Ok(())
            }
            Err(e) => {
                log_state_save(&cached.storage_key, changed, false);
                Err(e)
            }
        }
    }

    /// Replace the cached document with an empty one; persisted on the next save
    pub fn clear_state(&self, turn: &mut TurnContext) -> Result<()> {
        let storage_key = self.scope.storage_key(turn)?;
        turn.insert_cached_state(self.scope.cache_name(), CachedBotState::cleared(storage_key));
        Ok(())
    }

    /// Drop the cached document and remove it from storage
    pub async fn delete(&self, turn: &mut TurnContext) -> Result<()> {
        let storage_key = self.scope.storage_key(turn)?;
        turn.remove_cached_state(self.scope.cache_name());
        self.storage.delete(&[storage_key]).await
    }

    pub async fn get_property_value<T: DeserializeOwned>(
        &self,
        turn: &mut TurnContext,
        name: &str,
    ) -> Result<Option<T>> {
        let cached = self.loaded(turn).await?;
        match cached.state.get(name) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    pub async fn set_property_value<T: Serialize>(
        &self,
        turn: &mut TurnContext,
        name: &str,
        value: &T,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        let cached = self.loaded(turn).await?;
        cached.state.insert(name.to_string(), value);
        Ok(())
    }

    pub async fn delete_property_value(&self, turn: &mut TurnContext, name: &str) -> Result<()> {
        let cached = self.loaded(turn).await?;
        cached.state.remove(name);
        Ok(())
    }

    async fn loaded<'t>(&self, turn: &'t mut TurnContext) -> Result<&'t mut CachedBotState> {
        self.load(turn, false).await?;
        let cache_name = self.scope.cache_name();
        turn.cached_state_mut(cache_name).ok_or_else(|| {
            BotError::InvalidInput(format!("{} was not loaded for this turn", cache_name))
        })
    }
}

/// State scoped to a conversation
#[derive(Debug, Clone)]
pub struct ConversationState(BotState);

impl ConversationState {
    pub fn new(storage: StateStorage) -> Self {
        Self(BotState::new(StateScope::Conversation, storage))
    }
}

impl Deref for ConversationState {
    type Target = BotState;

    fn deref(&self) -> &BotState {
        &self.0
    }
}

/// State scoped to a user, shared across that user's conversations on a channel
#[derive(Debug, Clone)]
pub struct UserState(BotState);

impl UserState {
    pub fn new(storage: StateStorage) -> Self {
        Self(BotState::new(StateScope::User, storage))
    }
}

impl Deref for UserState {
    type Target = BotState;

    fn deref(&self) -> &BotState {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use crate::models::{Activity, ActivityType, ChannelAccount};

    fn message_turn(conversation_id: &str, user_id: &str) -> TurnContext {
        TurnContext::new(Activity::message(
            "test",
            conversation_id,
            ChannelAccount::new(user_id, None),
            "hi",
        ))
    }

    #[test]
    fn test_storage_keys() {
        let turn = message_turn("conv-1", "user-1");
        assert_eq!(StateScope::Conversation.storage_key(&turn).unwrap(), "test/conversations/conv-1");
        assert_eq!(StateScope::User.storage_key(&turn).unwrap(), "test/users/user-1");
    }

    #[test]
    fn test_user_key_requires_sender() {
        let turn = TurnContext::new(Activity::event(ActivityType::Typing, "test", "conv-1"));
        assert_matches!(StateScope::User.storage_key(&turn), Err(BotError::InvalidInput(_)));
        assert!(StateScope::Conversation.storage_key(&turn).is_ok());
    }

    #[tokio::test]
    async fn test_save_only_when_changed() {
        let storage = StateStorage::memory();
        let state = ConversationState::new(storage.clone());
        let mut turn = message_turn("conv-1", "user-1");

        state.load(&mut turn, false).await.unwrap();
        state.save_changes(&mut turn, false).await.unwrap();
        assert!(!storage.exists("test/conversations/conv-1").await.unwrap());

        state.set_property_value(&mut turn, "count", &3).await.unwrap();
        state.save_changes(&mut turn, false).await.unwrap();

        let stored = storage.read(&["test/conversations/conv-1".to_string()]).await.unwrap();
        assert_eq!(stored["test/conversations/conv-1"], json!({ "count": 3 }));
    }

    #[tokio::test]
    async fn test_forced_save_writes_unchanged_state() {
        let storage = StateStorage::memory();
        let state = ConversationState::new(storage.clone());
        let mut turn = message_turn("conv-1", "user-1");

        state.load(&mut turn, false).await.unwrap();
        state.save_changes(&mut turn, true).await.unwrap();

        let stored = storage.read(&["test/conversations/conv-1".to_string()]).await.unwrap();
        assert_eq!(stored["test/conversations/conv-1"], json!({}));
    }

    #[tokio::test]
    async fn test_forced_load_discards_cached_edits() {
        let storage = StateStorage::memory();
        let state = ConversationState::new(storage.clone());
        let mut turn = message_turn("conv-1", "user-1");

        state.set_property_value(&mut turn, "count", &1).await.unwrap();

        let mut changes = std::collections::HashMap::new();
        changes.insert("test/conversations/conv-1".to_string(), json!({ "count": 5 }));
        storage.write(changes).await.unwrap();

        state.load(&mut turn, false).await.unwrap();
        let count: Option<u64> = state.get_property_value(&mut turn, "count").await.unwrap();
        assert_eq!(count, Some(1));

        state.load(&mut turn, true).await.unwrap();
        let count: Option<u64> = state.get_property_value(&mut turn, "count").await.unwrap();
        assert_eq!(count, Some(5));
        assert!(!turn.cached_state("ConversationState").unwrap().is_changed());
    }

    #[tokio::test]
    async fn test_values_survive_across_turns() {
        let storage = StateStorage::memory();
        let state = UserState::new(storage);

        let mut first = message_turn("conv-1", "user-1");
        state.set_property_value(&mut first, "name", &"Ann").await.unwrap();
        state.save_changes(&mut first, false).await.unwrap();

        let mut second = message_turn("conv-2", "user-1");
        let name: Option<String> = state.get_property_value(&mut second, "name").await.unwrap();
        assert_eq!(name.as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn test_clear_and_delete() {
        let storage = StateStorage::memory();
        let state = ConversationState::new(storage.clone());
        let mut turn = message_turn("conv-1", "user-1");

        state.set_property_value(&mut turn, "count", &1).await.unwrap();
        state.save_changes(&mut turn, false).await.unwrap();

        state.clear_state(&mut turn).unwrap();
        let count: Option<u64> = state.get_property_value(&mut turn, "count").await.unwrap();
        assert_eq!(count, None);

        state.delete(&mut turn).await.unwrap();
        assert!(!storage.exists("test/conversations/conv-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_non_object_document_is_rejected() {
        let storage = StateStorage::memory();
        let mut changes = std::collections::HashMap::new();
        changes.insert("test/conversations/conv-1".to_string(), json!([1, 2]));
        storage.write(changes).await.unwrap();

        let state = ConversationState::new(storage);
        let mut turn = message_turn("conv-1", "user-1");
        assert_matches!(state.load(&mut turn, false).await, Err(BotError::InvalidInput(_)));
    }
}
