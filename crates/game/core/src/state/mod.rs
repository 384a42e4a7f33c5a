//! Authoritative match state.
//!
//! [`MatchState`] owns both combatants for the lifetime of a match. Runtime
//! layers clone or query it but mutate it only through the match clock.
mod common;

pub use common::{Facing, PlayerId, Tick, Vec2};

use crate::combatant::CombatantState;
use crate::config::GameConfig;

/// Rule set a match runs under.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MatchMode {
    /// Timed rounds, damage sticks.
    #[default]
    Versus,
    /// No countdown, full meter, health refilled after every combo.
    Training,
}

/// Where the match is in its round cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchPhase {
    #[default]
    Fighting,
    /// A round ended; the next starts after `resume_in` ticks.
    RoundOver { resume_in: u32 },
    Finished,
}

/// Final outcome of a round or of the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchResult {
    Winner(PlayerId),
    Draw,
}

impl MatchResult {
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            Self::Winner(player) => Some(player),
            Self::Draw => None,
        }
    }
}

/// Canonical snapshot of a running match.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    /// Ticks simulated so far. Pauses do not advance it.
    pub tick: Tick,
    pub mode: MatchMode,
    pub combatants: [CombatantState; GameConfig::MAX_COMBATANTS],
    /// Countdown of the current round.
    pub remaining_ticks: u32,
    pub is_paused: bool,
    /// One-based number of the current round.
    pub round: u8,
    pub round_wins: [u8; GameConfig::MAX_COMBATANTS],
    pub phase: MatchPhase,
    /// Set once the match is finished.
    pub result: Option<MatchResult>,
}

impl MatchState {
    pub fn new(
        mode: MatchMode,
        combatants: [CombatantState; GameConfig::MAX_COMBATANTS],
        round_ticks: u32,
    ) -> Self {
        Self {
            tick: Tick::ZERO,
            mode,
            combatants,
            remaining_ticks: round_ticks,
            is_paused: false,
            round: 1,
            round_wins: [0; GameConfig::MAX_COMBATANTS],
            phase: MatchPhase::Fighting,
            result: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Finished
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.result.and_then(MatchResult::winner)
    }

    pub fn combatant(&self, player: PlayerId) -> &CombatantState {
        &self.combatants[player.index()]
    }

    pub fn combatant_mut(&mut self, player: PlayerId) -> &mut CombatantState {
        &mut self.combatants[player.index()]
    }

    /// SHA-256 over the bincode encoding of the whole state.
    ///
    /// Two runs fed the same inputs produce the same digest at the same tick.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be encoded.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self).expect("MatchState serialization should not fail");
        Sha256::digest(&bytes).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fighter;

    fn state() -> MatchState {
        let character = fighter();
        let config = GameConfig::default();
        MatchState::new(
            MatchMode::Versus,
            [
                CombatantState::new(
                    PlayerId::One,
                    &character,
                    Vec2::new(config.spawn_x[0], config.ground_level),
                    Facing::Right,
                ),
                CombatantState::new(
                    PlayerId::Two,
                    &character,
                    Vec2::new(config.spawn_x[1], config.ground_level),
                    Facing::Left,
                ),
            ],
            config.round_ticks,
        )
    }

    #[test]
    fn fresh_match_is_in_first_round() {
        let state = state();
        assert_eq!(state.round, 1);
        assert_eq!(state.remaining_ticks, 5940);
        assert!(!state.is_over());
        assert_eq!(state.winner(), None);
        assert_eq!(state.combatant(PlayerId::Two).position.x, 880.0);
    }

    #[test]
    fn mode_parses_from_snake_case() {
        assert_eq!("training".parse::<MatchMode>(), Ok(MatchMode::Training));
        assert_eq!(MatchMode::Versus.to_string(), "versus");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_tracks_state_changes() {
        let mut state = state();
        let before = state.digest();
        assert_eq!(before, state.clone().digest());

        state.combatant_mut(PlayerId::One).health = 50;
        assert_ne!(hex::encode(before), hex::encode(state.digest()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_hashes_the_encoded_state() {
        use sha2::{Digest, Sha256};

        let state = state();
        let encoded = bincode::serialize(&state).unwrap();
        assert!(!encoded.is_empty());

        let expected: [u8; 32] = Sha256::digest(&encoded).into();
        let empty: [u8; 32] = Sha256::digest(b"").into();
        assert_eq!(state.digest(), expected);
        assert_ne!(state.digest(), empty);
    }
}
