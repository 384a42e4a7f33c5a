//! Events emitted by the match clock and the listener interface.

use super::command::{Command, CommandError};
use crate::combat::HitOutcome;
use crate::combatant::MovementState;
use crate::input::{ActionKind, InputError};
use crate::state::{MatchResult, PlayerId, Tick};

/// Everything observable that happened during a tick, in order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchEvent {
    StateChanged {
        player: PlayerId,
        from: MovementState,
        to: MovementState,
    },
    Hit(HitOutcome),
    SpecialRecognized {
        player: PlayerId,
        name: String,
    },
    CommandRejected {
        player: PlayerId,
        command: Command,
        error: CommandError,
    },
    /// An action could not be recorded into the player's input history.
    InputRejected {
        player: PlayerId,
        action: ActionKind,
        error: InputError,
    },
    RoundStarted {
        round: u8,
    },
    RoundEnded {
        round: u8,
        result: MatchResult,
    },
    MatchEnded {
        result: MatchResult,
    },
    Paused,
    Resumed,
}

/// Events produced by one call to [`MatchClock::tick`](super::MatchClock::tick).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    /// The tick that was processed.
    pub tick: Tick,
    /// False when the clock was paused or the match already finished.
    pub advanced: bool,
    pub events: Vec<MatchEvent>,
}

impl TickReport {
    pub fn hits(&self) -> impl Iterator<Item = &HitOutcome> {
        self.events.iter().filter_map(|event| match event {
            MatchEvent::Hit(outcome) => Some(outcome),
            _ => None,
        })
    }

    pub fn match_result(&self) -> Option<MatchResult> {
        self.events.iter().find_map(|event| match event {
            MatchEvent::MatchEnded { result } => Some(*result),
            _ => None,
        })
    }
}

/// Observer registered on a match clock.
///
/// Notifications are fire-and-forget: they run synchronously at the end of
/// the tick and cannot influence the simulation. All methods default to
/// no-ops.
pub trait MatchListener: Send {
    /// Called for every event before the specific callback below.
    fn on_event(&mut self, _tick: Tick, _event: &MatchEvent) {}

    fn on_state_changed(&mut self, _player: PlayerId, _from: MovementState, _to: MovementState) {}

    fn on_hit(&mut self, _outcome: &HitOutcome) {}

    fn on_match_end(&mut self, _result: MatchResult) {}
}

pub(crate) fn dispatch(listeners: &mut [Box<dyn MatchListener>], tick: Tick, events: &[MatchEvent]) {
    for listener in listeners.iter_mut() {
        for event in events {
            listener.on_event(tick, event);
            match event {
                MatchEvent::StateChanged { player, from, to } => {
                    listener.on_state_changed(*player, *from, *to)
                }
                MatchEvent::Hit(outcome) => listener.on_hit(outcome),
                MatchEvent::MatchEnded { result } => listener.on_match_end(*result),
                _ => {}
            }
        }
    }
}
