//! Telegram test data
//!
//! Builds Telegram users and messages without talking to the Bot API.

use teloxide::types::{
    Message, User, Chat, ChatKind, MessageKind, MessageCommon, MessageNewChatMembers,
    UserId, ChatId, MessageId, ChatPrivate, ChatPublic, PublicChatKind, PublicChatSupergroup,
    MediaKind, MediaText,
};
use chrono::Utc;

pub const TEST_BOT_USER_ID: u64 = 1000;

/// Telegram user with the given id and first name
pub fn create_test_user(user_id: u64, first_name: &str, is_bot: bool) -> User {
    User {
        id: UserId(user_id),
        is_bot,
        first_name: first_name.to_string(),
        last_name: None,
        username: None,
        language_code: Some("en".to_string()),
        is_premium: false,
        added_to_attachment_menu: false,
    }
}

/// The bot's own account
pub fn create_bot_user() -> User {
    create_test_user(TEST_BOT_USER_ID, "EchoCounterBot", true)
}

/// Private chats for positive ids, supergroups for negative ids
pub fn create_test_chat(chat_id: i64) -> Chat {
    let kind = if chat_id > 0 {
        ChatKind::Private(ChatPrivate {
            username: None,
            first_name: Some("Private".to_string()),
            last_name: None,
        })
    } else {
        ChatKind::Public(ChatPublic {
            title: Some("Test Group".to_string()),
            kind: PublicChatKind::Supergroup(PublicChatSupergroup {
                username: None,
                is_forum: false,
            }),
        })
    };

    Chat {
        id: ChatId(chat_id),
        kind,
    }
}

fn create_message(from: User, chat_id: i64, kind: MessageKind) -> Message {
    Message {
        id: MessageId(1),
        thread_id: None,
        from: Some(from),
        sender_chat: None,
        sender_business_bot: None,
        date: Utc::now(),
        chat: create_test_chat(chat_id),
        is_topic_message: false,
        via_bot: None,
        kind,
    }
}

/// Plain text message from `user` in `chat_id`
pub fn create_text_message(user: User, chat_id: i64, text: &str) -> Message {
    create_message(
        user,
        chat_id,
        MessageKind::Common(MessageCommon {
            author_signature: None,
            forward_origin: None,
            external_reply: None,
            quote: None,
            reply_to_story: None,
            edit_date: None,
            media_kind: MediaKind::Text(MediaText {
                text: text.to_string(),
                entities: vec![],
                link_preview_options: None,
            }),
            reply_markup: None,
            effect_id: None,
            reply_to_message: None,
            sender_boost_count: None,
            is_automatic_forward: false,
            has_protected_content: false,
            is_from_offline: false,
            business_connection_id: None,
        }),
    )
}

/// Service message announcing new members in a group
pub fn create_new_members_message(chat_id: i64, members: Vec<User>) -> Message {
    let from = members.first().cloned().unwrap_or_else(create_bot_user);
    create_message(
        from,
        chat_id,
        MessageKind::NewChatMembers(MessageNewChatMembers {
            new_chat_members: members,
        }),
    )
}
