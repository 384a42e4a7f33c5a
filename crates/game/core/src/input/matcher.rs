//! Special-move recognition over the per-player input histories.

use super::action::{Action, ActionKind};
use super::history::{InputError, InputHistory};
use crate::config::GameConfig;
use crate::state::{PlayerId, Tick};

/// Named ordered sequence of inputs that triggers a special move.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovePattern {
    pub name: String,
    pub sequence: Vec<ActionKind>,
}

impl MovePattern {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<ActionKind>>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    /// Whether `inputs` contains the sequence contiguously, anywhere.
    pub fn is_contained_in(&self, inputs: &[ActionKind]) -> bool {
        !self.sequence.is_empty()
            && inputs
                .windows(self.sequence.len())
                .any(|window| window == self.sequence.as_slice())
    }
}

/// What happens to a player's history once a special is recognized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BufferClearPolicy {
    /// Cleared when the recognized special actually starts.
    #[default]
    OnExecute,
    /// Cleared as soon as a pattern matches, even if the move is then rejected.
    OnMatch,
    /// Never cleared; entries only age out through the TTL.
    Never,
}

/// Recognizes special-move patterns in each player's recent inputs.
///
/// Apart from the histories the matcher keeps no state between calls.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputSequenceMatcher {
    histories: [InputHistory; GameConfig::MAX_COMBATANTS],
    patterns: [Vec<MovePattern>; GameConfig::MAX_COMBATANTS],
    ttl: u64,
    policy: BufferClearPolicy,
}

impl InputSequenceMatcher {
    pub fn new(ttl: u64, policy: BufferClearPolicy) -> Self {
        Self {
            histories: Default::default(),
            patterns: Default::default(),
            ttl,
            policy,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.input_ttl_ticks, config.clear_policy)
    }

    /// Replaces the patterns checked for `player`, in declaration order.
    pub fn set_patterns(&mut self, player: PlayerId, patterns: Vec<MovePattern>) {
        self.patterns[player.index()] = patterns;
    }

    pub fn with_patterns(mut self, player: PlayerId, patterns: Vec<MovePattern>) -> Self {
        self.set_patterns(player, patterns);
        self
    }

    pub fn patterns(&self, player: PlayerId) -> &[MovePattern] {
        &self.patterns[player.index()]
    }

    pub fn history(&self, player: PlayerId) -> &InputHistory {
        &self.histories[player.index()]
    }

    pub fn policy(&self) -> BufferClearPolicy {
        self.policy
    }

    /// Appends an input to the player's history.
    pub fn record(
        &mut self,
        player: PlayerId,
        kind: ActionKind,
        tick: Tick,
    ) -> Result<(), InputError> {
        self.histories[player.index()].record(Action::new(player, kind, tick))
    }

    /// Returns the special move whose pattern appears in the player's recent
    /// inputs, if any.
    ///
    /// Entries older than the TTL relative to `now` are purged first. When
    /// several patterns match the longest wins; equal lengths resolve to the
    /// one declared first.
    pub fn match_special(&mut self, player: PlayerId, now: Tick) -> Option<String> {
        let slot = player.index();
        self.histories[slot].purge_stale(now, self.ttl);

        let inputs = self.histories[slot].kinds();
        let mut best: Option<&MovePattern> = None;
        for pattern in &self.patterns[slot] {
            let longer = best.is_none_or(|b| pattern.sequence.len() > b.sequence.len());
            if longer && pattern.is_contained_in(&inputs) {
                best = Some(pattern);
            }
        }

        let name = best.map(|pattern| pattern.name.clone())?;
        if self.policy == BufferClearPolicy::OnMatch {
            self.histories[slot].clear();
        }
        Some(name)
    }

    /// Signals that a recognized special started for `player`.
    pub fn confirm_executed(&mut self, player: PlayerId) {
        if self.policy == BufferClearPolicy::OnExecute {
            self.histories[player.index()].clear();
        }
    }

    /// Forgets all recorded inputs, e.g. between rounds.
    pub fn clear(&mut self) {
        for history in &mut self.histories {
            history.clear();
        }
    }
}

impl Default for InputSequenceMatcher {
    fn default() -> Self {
        Self::new(GameConfig::DEFAULT_INPUT_TTL_TICKS, BufferClearPolicy::default())
    }
}
