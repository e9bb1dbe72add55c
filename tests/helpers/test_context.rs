//! Test context for turn-level tests
//!
//! Wires storage, state containers, accessors and the bot the same way the
//! binary does, but against in-memory storage.

use std::sync::{Arc, Once};
use echo_counter_bot::{
    models::{Activity, ActivityType, ChannelAccount},
    state::{BotAccessors, ConversationState, StateStorage, TurnContext, UserState},
    EchoWithCounterBot, Result,
};

static INIT: Once = Once::new();

pub const TEST_CHANNEL: &str = "test";
pub const BOT_ID: &str = "bot";

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// Bot plus the storage it writes to
pub struct TestContext {
    pub storage: StateStorage,
    pub conversation_state: Arc<ConversationState>,
    pub user_state: Arc<UserState>,
    pub accessors: Arc<BotAccessors>,
    pub bot: EchoWithCounterBot,
}

impl TestContext {
    /// Fully wired bot with both accessors created
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Bot whose accessor slots are left empty
    pub fn without_accessors() -> Self {
        Self::build(false)
    }

    fn build(create_accessors: bool) -> Self {
        init_test_env();

        let storage = StateStorage::memory();
        let conversation_state = Arc::new(ConversationState::new(storage.clone()));
        let user_state = Arc::new(UserState::new(storage.clone()));

        let mut builder = BotAccessors::builder()
            .conversation_state(conversation_state.clone())
            .user_state(user_state.clone());
        if create_accessors {
            builder = builder.with_default_accessors();
        }
        let accessors = Arc::new(builder.build().expect("containers are present"));

        Self {
            storage,
            conversation_state,
            user_state,
            bot: EchoWithCounterBot::new(accessors.clone()),
            accessors,
        }
    }

    /// Run one turn and return its replies
    pub async fn run(&self, activity: Activity) -> Result<Vec<String>> {
        let mut turn = TurnContext::new(activity);
        self.bot.on_turn(&mut turn).await?;
        Ok(turn.into_replies())
    }

    /// Send a text message from `user_id` in `conversation_id`
    pub async fn say(&self, conversation_id: &str, user_id: &str, text: &str) -> Vec<String> {
        self.run(message(conversation_id, user_id, text))
            .await
            .expect("turn should succeed")
    }
}

pub fn user(id: &str) -> ChannelAccount {
    ChannelAccount::new(id, Some(format!("User {}", id)))
}

pub fn message(conversation_id: &str, user_id: &str, text: &str) -> Activity {
    let mut activity = Activity::message(TEST_CHANNEL, conversation_id, user(user_id), text);
    activity.recipient = Some(ChannelAccount::new(BOT_ID, Some("Echo Bot".to_string())));
    activity
}

pub fn members_added(conversation_id: &str, member_ids: &[&str]) -> Activity {
    Activity::members_added(
        TEST_CHANNEL,
        conversation_id,
        ChannelAccount::new(BOT_ID, Some("Echo Bot".to_string())),
        member_ids.iter().map(|id| user(id)).collect(),
    )
}

pub fn event(activity_type: ActivityType, conversation_id: &str) -> Activity {
    Activity::event(activity_type, TEST_CHANNEL, conversation_id)
}
