//! Input recording and deterministic re-simulation.

use super::{MatchClock, MatchSetup};
use crate::input::{ActionKind, Control, DeviceInput};
use crate::state::{MatchState, PlayerId, Tick};

/// Anything that can be fed into the clock from outside.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    /// A canonical action, bypassing the device sampler.
    Action { player: PlayerId, kind: ActionKind },
    /// A control edge for a player, sampled with the player's facing.
    Control {
        player: PlayerId,
        control: Control,
        pressed: bool,
    },
    /// A raw device edge, mapped through the bindings.
    Device(DeviceInput),
    /// A move started directly by name.
    Perform { player: PlayerId, name: String },
}

/// An input together with the tick it was applied on.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoggedInput {
    pub tick: Tick,
    pub event: InputEvent,
}

/// Every input a clock applied, in application order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputLog {
    entries: Vec<LoggedInput>,
}

impl InputLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: Tick, event: InputEvent) {
        self.entries.push(LoggedInput { tick, event });
    }

    pub fn entries(&self) -> &[LoggedInput] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tick of the last recorded input.
    pub fn last_tick(&self) -> Option<Tick> {
        self.entries.last().map(|entry| entry.tick)
    }
}

impl FromIterator<LoggedInput> for InputLog {
    fn from_iter<I: IntoIterator<Item = LoggedInput>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Re-runs a match from `setup`, feeding `log` and simulating `ticks` ticks.
///
/// Fed the log of a previous run over the same number of ticks, the result
/// equals that run's final state.
pub fn replay(setup: MatchSetup, log: &InputLog, ticks: u64) -> MatchState {
    let mut clock = MatchClock::new(setup);
    for entry in log.entries() {
        clock.submit(entry.tick, entry.event.clone());
    }
    for _ in 0..ticks {
        clock.tick();
    }
    clock.snapshot()
}
