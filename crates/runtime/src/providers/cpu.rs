//! Utility-scored CPU opponent.

use async_trait::async_trait;
use fight_core::{
    ActionKind, CharacterConfig, CombatantState, InputEvent, MatchPhase, MatchState,
    MoveDefinition, MovementState, PlayerId,
};

use crate::api::{ActionProvider, Result};

/// What the CPU wants to do this tick.
#[derive(Clone, Debug, PartialEq)]
pub enum CpuIntent {
    Wait,
    Approach,
    Guard,
    Strike(String),
    Special(String),
}

/// Deterministic CPU opponent.
///
/// Every tick the provider scores a handful of intents against the snapshot
/// and sends the inputs of the best one:
///
/// 1. **Guard** while the opponent's attack is coming and close
/// 2. **Special** when the meter affords one that reaches
/// 3. **Strike** with a normal that reaches, rotating through them
/// 4. **Approach** by walking forward
/// 5. **Wait** otherwise
///
/// Specials are entered as their motion inputs, so they go through the same
/// input buffer a human's would.
#[derive(Debug, Clone)]
pub struct CpuProvider {
    character: CharacterConfig,
    /// Ticks between two decisions to strike; keeps the CPU from mashing.
    patience: u64,
}

impl CpuProvider {
    pub fn new(character: CharacterConfig) -> Self {
        Self {
            character,
            patience: 12,
        }
    }

    pub fn with_patience(mut self, patience: u64) -> Self {
        self.patience = patience.max(1);
        self
    }

    /// Horizontal distance between centers at which `definition` connects.
    fn reach(&self, definition: &MoveDefinition) -> f32 {
        definition.hitbox.right() - self.character.hurtbox.left()
    }

    fn in_reach<'a>(
        &'a self,
        moves: &'a [MoveDefinition],
        distance: f32,
    ) -> impl Iterator<Item = &'a MoveDefinition> + 'a {
        moves
            .iter()
            .filter(move |definition| distance < self.reach(definition))
    }

    /// Picks the intent for `me` against `opponent`.
    pub fn decide(&self, tick: u64, me: &CombatantState, opponent: &CombatantState) -> CpuIntent {
        let distance = (opponent.position.x - me.position.x).abs();
        let threat = self
            .character
            .normals
            .iter()
            .map(|definition| self.reach(definition))
            .fold(0.0_f32, f32::max);

        let mut scored: Vec<(u32, CpuIntent)> = vec![(10, CpuIntent::Wait)];

        if opponent.movement.is_attacking() && distance < threat * 1.5 && me.grounded {
            scored.push((80, CpuIntent::Guard));
        }

        if me.movement.can_special() {
            let special = self
                .in_reach(&self.character.specials, distance)
                .filter(|definition| definition.meter_cost <= me.meter)
                .max_by_key(|definition| definition.damage);
            if let Some(special) = special {
                scored.push((70, CpuIntent::Special(special.name.clone())));
            }
        }

        if me.movement.can_attack() && tick % self.patience == 0 {
            let normals: Vec<_> = self.in_reach(&self.character.normals, distance).collect();
            if !normals.is_empty() {
                let pick = (tick / self.patience) as usize % normals.len();
                scored.push((60, CpuIntent::Strike(normals[pick].name.clone())));
            }
        }

        let closest = self
            .character
            .normals
            .iter()
            .map(|definition| self.reach(definition))
            .fold(f32::INFINITY, f32::min);
        if distance >= closest * 0.8 {
            scored.push((40, CpuIntent::Approach));
        }

        // Highest score wins; earlier entries win ties.
        scored
            .into_iter()
            .rev()
            .max_by_key(|(score, _)| *score)
            .map(|(_, intent)| intent)
            .unwrap_or(CpuIntent::Wait)
    }

    fn inputs(&self, player: PlayerId, intent: CpuIntent) -> Vec<InputEvent> {
        let action = |kind| InputEvent::Action { player, kind };
        match intent {
            CpuIntent::Wait => Vec::new(),
            CpuIntent::Approach => vec![action(ActionKind::Forward)],
            CpuIntent::Guard => vec![action(ActionKind::Block)],
            CpuIntent::Strike(name) => vec![InputEvent::Perform { player, name }],
            CpuIntent::Special(name) => self
                .character
                .special(&name)
                .and_then(|definition| definition.input.clone())
                .map(|sequence| sequence.into_iter().map(action).collect())
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ActionProvider for CpuProvider {
    async fn provide_inputs(&self, player: PlayerId, state: &MatchState) -> Result<Vec<InputEvent>> {
        if state.phase != MatchPhase::Fighting || state.is_paused {
            return Ok(Vec::new());
        }
        let me = state.combatant(player);
        if me.movement == MovementState::Defeated {
            return Ok(Vec::new());
        }
        let opponent = state.combatant(player.opponent());

        let intent = self.decide(state.tick.0, me, opponent);
        tracing::trace!(target: "runtime::cpu", %player, tick = %state.tick, ?intent, "CPU decided");
        Ok(self.inputs(player, intent))
    }
}

#[cfg(test)]
mod tests {
    use fight_content::Roster;
    use fight_core::{Facing, GameConfig, MatchMode, Vec2};

    use super::*;

    fn mia() -> CharacterConfig {
        Roster::builtin().unwrap().get("mia").unwrap().clone()
    }

    fn pair(distance: f32) -> (CombatantState, CombatantState) {
        let character = mia();
        let ground = GameConfig::DEFAULT_GROUND_LEVEL;
        (
            CombatantState::new(PlayerId::One, &character, Vec2::new(400.0, ground), Facing::Right),
            CombatantState::new(
                PlayerId::Two,
                &character,
                Vec2::new(400.0 + distance, ground),
                Facing::Left,
            ),
        )
    }

    #[test]
    fn far_away_walks_in() {
        let cpu = CpuProvider::new(mia());
        let (me, opponent) = pair(400.0);
        assert_eq!(cpu.decide(0, &me, &opponent), CpuIntent::Approach);
    }

    #[test]
    fn close_and_patient_strikes() {
        let cpu = CpuProvider::new(mia()).with_patience(1);
        let (me, opponent) = pair(80.0);
        assert!(matches!(cpu.decide(0, &me, &opponent), CpuIntent::Strike(_)));
    }

    #[test]
    fn meter_buys_a_special_entered_as_motion() {
        let cpu = CpuProvider::new(mia());
        let (mut me, opponent) = pair(80.0);
        me.meter = 100;

        let intent = cpu.decide(1, &me, &opponent);
        assert_eq!(intent, CpuIntent::Special("water_dance".to_owned()));
        let inputs = cpu.inputs(PlayerId::One, intent);
        assert_eq!(inputs.len(), 4);
        assert_eq!(
            inputs.last(),
            Some(&InputEvent::Action {
                player: PlayerId::One,
                kind: ActionKind::Special
            })
        );
    }

    #[test]
    fn incoming_attack_is_guarded() {
        let cpu = CpuProvider::new(mia());
        let (me, mut opponent) = pair(90.0);
        let heavy = mia().find_move("heavy_kick").unwrap().clone();
        opponent.begin_attack(&heavy).unwrap();

        assert_eq!(cpu.decide(3, &me, &opponent), CpuIntent::Guard);
    }

    #[tokio::test]
    async fn nothing_between_rounds() {
        let character = mia();
        let (one, two) = pair(80.0);
        let mut state = MatchState::new(MatchMode::Versus, [one, two], 100);
        state.phase = MatchPhase::RoundOver { resume_in: 10 };

        let inputs = CpuProvider::new(character)
            .provide_inputs(PlayerId::One, &state)
            .await
            .unwrap();
        assert!(inputs.is_empty());
    }
}
