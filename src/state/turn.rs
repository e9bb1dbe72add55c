//! Turn context
//!
//! A turn is one incoming activity and the replies produced for it. State
//! containers cache their documents on the turn so property reads and writes
//! within a turn do not hit storage.

use std::collections::HashMap;
use serde_json::{Map, Value};
use crate::models::Activity;

/// State document loaded for one container during a turn
#[derive(Debug, Clone)]
pub struct CachedBotState {
    pub storage_key: String,
    pub state: Map<String, Value>,
    hash: String,
}

impl CachedBotState {
    pub(crate) fn loaded(storage_key: String, state: Map<String, Value>) -> Self {
        let hash = Self::compute_hash(&state);
        Self { storage_key, state, hash }
    }

    /// A cleared document; always reported as changed so the next save persists it
    pub(crate) fn cleared(storage_key: String) -> Self {
        Self {
            storage_key,
            state: Map::new(),
            hash: String::new(),
        }
    }

    /// Whether the document differs from what was last loaded or saved
    pub fn is_changed(&self) -> bool {
        Self::compute_hash(&self.state) != self.hash
    }

    pub(crate) fn mark_saved(&mut self) {
        self.hash = Self::compute_hash(&self.state);
    }

    fn compute_hash(state: &Map<String, Value>) -> String {
        Value::Object(state.clone()).to_string()
    }
}

/// Context for a single turn
#[derive(Debug)]
pub struct TurnContext {
    activity: Activity,
    replies: Vec<String>,
    state_cache: HashMap<&'static str, CachedBotState>,
}

impl TurnContext {
    pub fn new(activity: Activity) -> Self {
        Self {
            activity,
            replies: Vec::new(),
            state_cache: HashMap::new(),
        }
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// Queue a text reply for the channel adapter to deliver
    pub fn send_text(&mut self, text: impl Into<String>) {
        self.replies.push(text.into());
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    pub fn into_replies(self) -> Vec<String> {
        self.replies
    }

    pub(crate) fn cached_state(&self, cache_name: &str) -> Option<&CachedBotState> {
        self.state_cache.get(cache_name)
    }

    pub(crate) fn cached_state_mut(&mut self, cache_name: &str) -> Option<&mut CachedBotState> {
        self.state_cache.get_mut(cache_name)
    }

    pub(crate) fn insert_cached_state(&mut self, cache_name: &'static str, cached: CachedBotState) {
        self.state_cache.insert(cache_name, cached);
    }

    pub(crate) fn remove_cached_state(&mut self, cache_name: &str) -> Option<CachedBotState> {
        self.state_cache.remove(cache_name)
    }
}
