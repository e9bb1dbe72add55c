//! Typed property accessors

use std::marker::PhantomData;
use serde::{de::DeserializeOwned, Serialize};
use crate::utils::errors::Result;
use super::bot_state::BotState;
use super::turn::TurnContext;

/// Named, typed handle to one property of a state container
#[derive(Debug)]
pub struct StatePropertyAccessor<T> {
    name: String,
    state: BotState,
    _value: PhantomData<fn() -> T>,
}

impl<T> StatePropertyAccessor<T> {
    pub(crate) fn new(name: &str, state: BotState) -> Self {
        Self {
            name: name.to_string(),
            state,
            _value: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Container this accessor reads from and writes to
    pub fn state(&self) -> &BotState {
        &self.state
    }
}

impl<T> StatePropertyAccessor<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Stored value, if any
    pub async fn try_get(&self, turn: &mut TurnContext) -> Result<Option<T>> {
        self.state.get_property_value(turn, &self.name).await
    }

    /// Stored value, or the result of `default` which is written into the turn cache
    pub async fn get_or_insert_with<F>(&self, turn: &mut TurnContext, default: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.try_get(turn).await? {
            return Ok(value);
        }

        let value = default();
        self.set(turn, &value).await?;
        Ok(value)
    }

    pub async fn set(&self, turn: &mut TurnContext, value: &T) -> Result<()> {
        self.state.set_property_value(turn, &self.name, value).await
    }

    pub async fn delete(&self, turn: &mut TurnContext) -> Result<()> {
        self.state.delete_property_value(turn, &self.name).await
    }
}

impl<T> StatePropertyAccessor<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Stored value, or `T::default()`
    pub async fn get(&self, turn: &mut TurnContext) -> Result<T> {
        self.get_or_insert_with(turn, T::default).await
    }
}
