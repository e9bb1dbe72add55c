//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the bot.

use tracing::{info, debug, warn, error, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{BotError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.directory)?;

    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| BotError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| BotError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log an incoming turn
pub fn log_turn(channel_id: &str, conversation_id: &str, activity_type: &str, user_id: Option<&str>) {
    info!(
        channel_id = channel_id,
        conversation_id = conversation_id,
        activity_type = activity_type,
        user_id = user_id,
        "Turn received"
    );
}

/// Log the outcome of persisting a state container
pub fn log_state_save(storage_key: &str, changed: bool, success: bool) {
    if success {
        debug!(key = storage_key, changed = changed, "State saved");
    } else {
        error!(key = storage_key, "State save failed");
    }
}

/// Level for a failed turn: recoverable errors are transient and logged as warnings
pub fn handler_error_level(error: &BotError) -> Level {
    if error.is_recoverable() {
        Level::WARN
    } else {
        Level::ERROR
    }
}

/// Log a failed turn at the level its error warrants
pub fn log_handler_error(error: &BotError, chat_id: i64) {
    if handler_error_level(error) == Level::WARN {
        warn!(error = %error, severity = %error.severity(), chat_id = chat_id, "Recoverable error handling message");
    } else {
        error!(error = %error, severity = %error.severity(), chat_id = chat_id, "Error handling message");
    }
}
