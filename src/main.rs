//! Echo Counter Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{info, warn};

use echo_counter_bot::{
    config::Settings,
    utils::logging,
    handlers::{EchoWithCounterBot, TelegramAdapter},
    state::{BotAccessors, ConversationState, StateStorage, UserState},
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", echo_counter_bot::info());

    // Initialize state storage
    let storage = StateStorage::from_config(&settings.storage).await?;
    storage.test_connection().await?;
    info!(backend = storage.backend_name(), "State storage ready");

    let conversation_state = Arc::new(ConversationState::new(storage.clone()));
    let user_state = Arc::new(UserState::new(storage));

    let accessors = Arc::new(
        BotAccessors::builder()
            .conversation_state(conversation_state)
            .user_state(user_state)
            .with_default_accessors()
            .build()?,
    );

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);
    let me = bot.get_me().await?;
    info!(bot_id = me.user.id.0, "Authenticated with Telegram");

    let adapter = Arc::new(TelegramAdapter::new(&me.user, EchoWithCounterBot::new(accessors)));

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![adapter])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("Echo counter bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry().branch(Update::filter_message().endpoint(handle_messages))
}

/// Handle incoming messages, including new chat member notices
async fn handle_messages(bot: Bot, msg: Message, adapter: Arc<TelegramAdapter>) -> HandlerResult {
    if let Err(e) = adapter.handle_message(&bot, &msg).await {
        logging::log_handler_error(&e, msg.chat.id.0);
        return Err(e.into());
    }

    Ok(())
}
