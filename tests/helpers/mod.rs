//! Test helpers module
//!
//! Builds a bot wired to in-memory state storage, drives turns through it,
//! and creates Telegram test data.

#![allow(dead_code)]

pub mod telegram_data;
pub mod test_context;

pub use telegram_data::*;
pub use test_context::*;
