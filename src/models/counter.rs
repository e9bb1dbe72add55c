use serde::{Deserialize, Serialize};

/// Number of message turns seen in a conversation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub turn_count: u64,
}

impl CounterState {
    /// Advance the counter and return the new value
    pub fn increment(&mut self) -> u64 {
        self.turn_count = self.turn_count.saturating_add(1);
        self.turn_count
    }
}
