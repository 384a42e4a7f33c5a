use arrayvec::ArrayVec;

use super::action::{Action, ActionKind};
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::Tick;

/// Errors raised by the input history.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputError {
    /// The history grew past its capacity. Eviction should make this impossible.
    #[error("input history exceeded its capacity of {capacity}")]
    BufferOverrun { capacity: usize },

    /// A timestamp older than the newest recorded entry.
    #[error("input at {got} is older than the newest recorded input at {newest}")]
    OutOfOrder { newest: Tick, got: Tick },
}

impl GameError for InputError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BufferOverrun { .. } => "INPUT_BUFFER_OVERRUN",
            Self::OutOfOrder { .. } => "INPUT_OUT_OF_ORDER",
        }
    }
}

/// Bounded, ordered record of one player's most recent inputs.
///
/// Oldest entries are evicted first once [`GameConfig::HISTORY_CAPACITY`] is
/// reached. Timestamps never decrease from front to back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputHistory {
    entries: ArrayVec<Action, { GameConfig::HISTORY_CAPACITY }>,
}

impl InputHistory {
    pub const CAPACITY: usize = GameConfig::HISTORY_CAPACITY;

    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an action, evicting the oldest entry when full.
    pub fn record(&mut self, action: Action) -> Result<(), InputError> {
        if let Some(newest) = self.entries.last()
            && action.timestamp < newest.timestamp
        {
            return Err(InputError::OutOfOrder {
                newest: newest.timestamp,
                got: action.timestamp,
            });
        }

        if self.entries.is_full() {
            self.entries.remove(0);
        }
        self.entries
            .try_push(action)
            .map_err(|_| InputError::BufferOverrun {
                capacity: Self::CAPACITY,
            })
    }

    /// Drops entries older than `ttl` ticks relative to `now`.
    ///
    /// An entry is stale when `now - timestamp > ttl`. Because timestamps are
    /// ordered, stale entries always form a prefix.
    pub fn purge_stale(&mut self, now: Tick, ttl: u64) {
        let stale = self
            .entries
            .iter()
            .take_while(|action| now.since(action.timestamp) > ttl)
            .count();
        if stale > 0 {
            self.entries.drain(..stale);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.entries.iter()
    }

    /// Recorded action kinds, oldest first.
    pub fn kinds(&self) -> ArrayVec<ActionKind, { GameConfig::HISTORY_CAPACITY }> {
        self.entries.iter().map(|action| action.kind).collect()
    }
}
