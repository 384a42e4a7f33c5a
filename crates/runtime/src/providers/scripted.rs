//! Fixed input schedule, for tests and demos.

use std::collections::BTreeMap;

use async_trait::async_trait;
use fight_core::{ActionKind, InputEvent, MatchState, PlayerId, Tick};

use crate::api::{ActionProvider, Result};

/// Sends pre-recorded inputs on the ticks they were scheduled for.
///
/// Inputs carry their own player, so the schedule is replayed as written
/// whichever slot the provider is registered for.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    schedule: BTreeMap<Tick, Vec<InputEvent>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event` for `tick`.
    pub fn at(mut self, tick: impl Into<Tick>, event: InputEvent) -> Self {
        self.schedule.entry(tick.into()).or_default().push(event);
        self
    }

    /// Schedules a canonical action for `player`.
    pub fn action(self, tick: impl Into<Tick>, player: PlayerId, kind: ActionKind) -> Self {
        self.at(tick, InputEvent::Action { player, kind })
    }

    /// Schedules every action of `sequence` for the same tick.
    pub fn motion(mut self, tick: impl Into<Tick>, player: PlayerId, sequence: &[ActionKind]) -> Self {
        let tick = tick.into();
        for &kind in sequence {
            self = self.action(tick, player, kind);
        }
        self
    }

    /// Tick of the last scheduled input.
    pub fn last_tick(&self) -> Option<Tick> {
        self.schedule.keys().next_back().copied()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide_inputs(&self, _player: PlayerId, state: &MatchState) -> Result<Vec<InputEvent>> {
        Ok(self.schedule.get(&state.tick).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use fight_content::Roster;
    use fight_core::{GameConfig, MatchClock, MatchSetup};

    use super::*;

    #[tokio::test]
    async fn replays_inputs_on_their_tick() {
        let mia = Roster::builtin().unwrap().get("mia").unwrap().clone();
        let mut clock = MatchClock::new(MatchSetup::new(GameConfig::default(), mia.clone(), mia));
        let script = ScriptedProvider::new()
            .action(2u64, PlayerId::One, ActionKind::Up)
            .motion(5u64, PlayerId::One, &[ActionKind::Down, ActionKind::DownForward]);

        let mut sent = Vec::new();
        for _ in 0..8 {
            let inputs = script
                .provide_inputs(PlayerId::One, clock.state())
                .await
                .unwrap();
            sent.push(inputs.len());
            for input in inputs {
                clock.submit(clock.state().tick, input);
            }
            clock.tick();
        }

        assert_eq!(sent, [0, 0, 1, 0, 0, 2, 0, 0]);
        assert_eq!(script.last_tick(), Some(Tick(5)));
        assert_eq!(clock.input_log().len(), 3);
    }
}
