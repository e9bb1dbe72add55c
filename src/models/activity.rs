//! Activity model
//!
//! An activity is one conversational event flowing into or out of the bot.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Kind of conversational event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityType {
    Message,
    ConversationUpdate,
    Typing,
    EndOfConversation,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Message => "message",
            ActivityType::ConversationUpdate => "conversationUpdate",
            ActivityType::Typing => "typing",
            ActivityType::EndOfConversation => "endOfConversation",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A participant in a conversation (user or bot)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAccount {
    pub id: String,
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self { id: id.into(), name }
    }

    /// Display name, falling back to the account id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Conversation reference carried by an activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationAccount {
    pub id: String,
    pub is_group: bool,
}

/// Conversational event
#[derive(Debug, Clone)]
pub struct Activity {
    pub id: Uuid,
    pub activity_type: ActivityType,
    pub channel_id: String,
    pub conversation: Option<ConversationAccount>,
    pub from: Option<ChannelAccount>,
    pub recipient: Option<ChannelAccount>,
    pub text: Option<String>,
    pub members_added: Vec<ChannelAccount>,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    fn new(activity_type: ActivityType, channel_id: &str, conversation_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity_type,
            channel_id: channel_id.to_string(),
            conversation: Some(ConversationAccount {
                id: conversation_id.to_string(),
                is_group: false,
            }),
            from: None,
            recipient: None,
            text: None,
            members_added: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create an incoming text message
    pub fn message(channel_id: &str, conversation_id: &str, from: ChannelAccount, text: &str) -> Self {
        let mut activity = Self::new(ActivityType::Message, channel_id, conversation_id);
        activity.from = Some(from);
        activity.text = Some(text.to_string());
        activity
    }

    /// Create a conversation update announcing new members
    pub fn members_added(
        channel_id: &str,
        conversation_id: &str,
        recipient: ChannelAccount,
        members: Vec<ChannelAccount>,
    ) -> Self {
        let mut activity = Self::new(ActivityType::ConversationUpdate, channel_id, conversation_id);
        activity.from = members.first().cloned();
        activity.recipient = Some(recipient);
        activity.members_added = members;
        activity
    }

    /// Create an activity of an arbitrary type with no payload
    pub fn event(activity_type: ActivityType, channel_id: &str, conversation_id: &str) -> Self {
        Self::new(activity_type, channel_id, conversation_id)
    }

    /// Mark the conversation as a group chat
    pub fn in_group(mut self) -> Self {
        if let Some(conversation) = self.conversation.as_mut() {
            conversation.is_group = true;
        }
        self
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation.as_ref().map(|c| c.id.as_str())
    }

    pub fn from_id(&self) -> Option<&str> {
        self.from.as_ref().map(|f| f.id.as_str())
    }

    pub fn recipient_id(&self) -> Option<&str> {
        self.recipient.as_ref().map(|r| r.id.as_str())
    }
}
