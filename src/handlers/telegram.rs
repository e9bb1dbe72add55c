//! Telegram channel adapter
//!
//! Converts incoming Telegram messages into activities, runs the turn, and
//! delivers the replies to the originating chat.

use teloxide::{Bot, types::{Message, User}, prelude::*};
use tracing::{debug, warn};
use crate::models::{Activity, ChannelAccount};
use crate::state::TurnContext;
use crate::utils::errors::Result;
use super::turn::EchoWithCounterBot;

/// Channel id used in storage keys for Telegram conversations
pub const CHANNEL_ID: &str = "telegram";

/// Bridges the Telegram dispatcher and the turn handler
#[derive(Debug, Clone)]
pub struct TelegramAdapter {
    bot_account: ChannelAccount,
    handler: EchoWithCounterBot,
}

impl TelegramAdapter {
    pub fn new(bot_user: &User, handler: EchoWithCounterBot) -> Self {
        Self {
            bot_account: account_from_user(bot_user),
            handler,
        }
    }

    pub fn bot_account(&self) -> &ChannelAccount {
        &self.bot_account
    }

    /// Build the activity for an incoming message
    pub fn activity_from_message(&self, msg: &Message) -> Activity {
        let conversation_id = msg.chat.id.0.to_string();

        let activity = match msg.new_chat_members() {
            Some(members) => Activity::members_added(
                CHANNEL_ID,
                &conversation_id,
                self.bot_account.clone(),
                members.iter().map(account_from_user).collect(),
            ),
            None => {
                let from = msg
                    .from
                    .as_ref()
                    .map(account_from_user)
                    .unwrap_or_else(|| ChannelAccount::new(conversation_id.clone(), None));
                let mut activity = Activity::message(
                    CHANNEL_ID,
                    &conversation_id,
                    from,
                    msg.text().unwrap_or_default(),
                );
                activity.recipient = Some(self.bot_account.clone());
                activity
            }
        };

        if msg.chat.is_group() || msg.chat.is_supergroup() {
            activity.in_group()
        } else {
            activity
        }
    }

    /// Run one turn for a Telegram message and send the replies
    pub async fn handle_message(&self, bot: &Bot, msg: &Message) -> Result<()> {
        let activity = self.activity_from_message(msg);
        debug!(chat_id = ?msg.chat.id, activity_id = %activity.id, "Processing Telegram message");

        let mut turn = TurnContext::new(activity);
        self.handler.on_turn(&mut turn).await?;

        let replies = turn.into_replies();
        if replies.is_empty() {
            debug!(chat_id = ?msg.chat.id, "Turn produced no replies");
        }

        for reply in replies {
            if let Err(e) = bot.send_message(msg.chat.id, reply).await {
                warn!(chat_id = ?msg.chat.id, error = %e, "Failed to deliver reply");
                return Err(e.into());
            }
        }

        Ok(())
    }
}

fn account_from_user(user: &User) -> ChannelAccount {
    ChannelAccount::new(user.id.0.to_string(), Some(user.full_name()))
}
