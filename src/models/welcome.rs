use serde::{Deserialize, Serialize};

/// Whether the bot has already greeted a user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeUserState {
    pub did_bot_welcome_user: bool,
}
