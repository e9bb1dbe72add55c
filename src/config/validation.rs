//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{BotError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(BotError::Config(
            "Bot token is required".to_string()
        ));
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.backend != StorageBackend::Redis {
        return Ok(());
    }

    if config.redis.url.is_empty() {
        return Err(BotError::Config(
            "Redis URL is required for the redis backend".to_string()
        ));
    }

    if config.redis.prefix.is_empty() {
        return Err(BotError::Config(
            "Redis key prefix must not be empty".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(BotError::Config(
            "Log level is required".to_string()
        ));
    }

    if config.directory.is_empty() || config.file_name.is_empty() {
        return Err(BotError::Config(
            "Log directory and file name are required".to_string()
        ));
    }

    Ok(())
}
