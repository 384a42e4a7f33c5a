//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a match can run
//! with device input, scripted fixtures, or CPU opponents.
use async_trait::async_trait;
use fight_core::{InputEvent, MatchState, PlayerId};

use super::errors::Result;

/// Trait for providing inputs based on the current match state.
///
/// Different implementations can handle:
/// - Player input (from a device loop)
/// - CPU opponents
/// - Scripted/replayed inputs
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Inputs `player` sends for the tick about to be processed.
    ///
    /// # Arguments
    /// * `player` - The player the inputs are for
    /// * `state` - Read-only snapshot taken before the tick
    async fn provide_inputs(&self, player: PlayerId, state: &MatchState) -> Result<Vec<InputEvent>>;
}

/// A provider that never presses anything.
/// Useful for training dummies or as a fallback.
pub struct IdleProvider;

#[async_trait]
impl ActionProvider for IdleProvider {
    async fn provide_inputs(&self, _player: PlayerId, _state: &MatchState) -> Result<Vec<InputEvent>> {
        Ok(Vec::new())
    }
}
