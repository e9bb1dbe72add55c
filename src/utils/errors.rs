//! Error handling for the echo counter bot
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the bot
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Missing dependency: {name}")]
    MissingDependency { name: &'static str },

    #[error("Accessor not initialized: {name}")]
    AccessorNotInitialized { name: &'static str },

    #[error("Accessor already set: {name}")]
    AccessorAlreadySet { name: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

impl BotError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            BotError::MissingDependency { .. } => false,
            BotError::AccessorNotInitialized { .. } => false,
            BotError::AccessorAlreadySet { .. } => false,
            BotError::Config(_) => false,
            BotError::InvalidInput(_) => false,
            BotError::Redis(_) => true,
            BotError::Telegram(_) => true,
            BotError::Serialization(_) => false,
            BotError::Io(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BotError::MissingDependency { .. } => ErrorSeverity::Critical,
            BotError::AccessorNotInitialized { .. } => ErrorSeverity::Critical,
            BotError::Config(_) => ErrorSeverity::Critical,
            BotError::AccessorAlreadySet { .. } => ErrorSeverity::Warning,
            BotError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
