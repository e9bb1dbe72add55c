//! Turn handler
//!
//! Counts message turns per conversation and echoes them back, greeting each
//! user once on their first message.

use std::sync::Arc;
use tracing::{debug, info};
use crate::models::{ActivityType, CounterState};
use crate::state::{BotAccessors, TurnContext};
use crate::utils::errors::Result;
use crate::utils::logging::log_turn;

pub const FIRST_MESSAGE_TEXT: &str =
    "You are seeing this message because this was your first message ever to this bot.";

pub const INTRO_TEXT: &str = "I echo back everything you send and count the turns of our conversation. \
    Say 'intro' or 'help' to see this message again.";

/// Echo bot that keeps a per-conversation turn counter and a per-user welcome flag
#[derive(Debug, Clone)]
pub struct EchoWithCounterBot {
    accessors: Arc<BotAccessors>,
}

impl EchoWithCounterBot {
    pub fn new(accessors: Arc<BotAccessors>) -> Self {
        Self { accessors }
    }

    pub fn accessors(&self) -> &Arc<BotAccessors> {
        &self.accessors
    }

    /// Process one turn and persist any state it changed
    pub async fn on_turn(&self, turn: &mut TurnContext) -> Result<()> {
        let activity = turn.activity();
        log_turn(
            &activity.channel_id,
            activity.conversation_id().unwrap_or_default(),
            activity.activity_type.as_str(),
            activity.from_id(),
        );

        match activity.activity_type.clone() {
            ActivityType::Message => self.on_message(turn).await?,
            ActivityType::ConversationUpdate => self.on_members_added(turn),
            other => turn.send_text(format!("{} event detected", other)),
        }

        self.accessors.conversation_state().save_changes(turn, false).await?;
        self.accessors.user_state().save_changes(turn, false).await?;
        Ok(())
    }

    async fn on_message(&self, turn: &mut TurnContext) -> Result<()> {
        let welcome_accessor = self.accessors.welcome_user_state()?;
        let mut welcome = welcome_accessor.get(turn).await?;

        if !welcome.did_bot_welcome_user {
            welcome.did_bot_welcome_user = true;
            welcome_accessor.set(turn, &welcome).await?;

            let name = turn
                .activity()
                .from
                .as_ref()
                .map(|from| from.display_name().to_string())
                .unwrap_or_default();

            info!(user_id = ?turn.activity().from_id(), "Welcoming user on first message");
            turn.send_text(FIRST_MESSAGE_TEXT);
            turn.send_text(format!("Welcome, {}! {}", name, INTRO_TEXT));
            return Ok(());
        }

        let text = turn.activity().text.clone().unwrap_or_default();
        if matches!(text.trim().to_lowercase().as_str(), "intro" | "help") {
            turn.send_text(INTRO_TEXT);
            return Ok(());
        }

        let counter_accessor = self.accessors.counter_state()?;
        let mut counter: CounterState = counter_accessor.get(turn).await?;
        let turn_count = counter.increment();
        counter_accessor.set(turn, &counter).await?;

        debug!(turn_count = turn_count, "Turn counted");
        turn.send_text(format!("Turn {}: You sent '{}'", turn_count, text));
        Ok(())
    }

    fn on_members_added(&self, turn: &mut TurnContext) {
        let activity = turn.activity();
        let recipient_id = activity.recipient_id().map(str::to_string);

        let greetings: Vec<String> = activity
            .members_added
            .iter()
            .filter(|member| Some(member.id.as_str()) != recipient_id.as_deref())
            .map(|member| format!("Hi there, {}! {}", member.display_name(), INTRO_TEXT))
            .collect();

        for greeting in greetings {
            turn.send_text(greeting);
        }
    }
}
