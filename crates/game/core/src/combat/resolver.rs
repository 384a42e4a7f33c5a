//! Hit detection and damage application between two combatants.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use crate::combatant::{CombatantState, MovementState};
use crate::config::GameConfig;
use crate::state::PlayerId;

/// Result of a landed hit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitOutcome {
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub move_name: String,
    pub damage_dealt: u32,
    /// Signed horizontal displacement applied to the defender.
    pub knockback_applied: f32,
    pub was_blocked: bool,
}

/// A hit that passed every precondition and waits to be applied.
struct PendingHit {
    damage: u32,
    knockback: f32,
    move_name: String,
    instance: u32,
}

/// Applies hits between combatants, at most once per move activation and
/// defender.
///
/// The registry remembers `(attacker, move instance, defender)` triples that
/// already connected. Entries for moves that are no longer running are
/// dropped by [`HitResolver::prune`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitResolver {
    registry: BTreeSet<(PlayerId, u32, PlayerId)>,
}

impl HitResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks and applies a hit from `attacker` on `defender`.
    ///
    /// # Formula
    ///
    /// ```text
    /// effective = blocking ? damage * block_damage_percent / 100 : damage
    /// health    = max(0, health - effective)
    /// position += attacker.facing * knockback
    /// ```
    ///
    /// Returns `None` and leaves both combatants untouched when the attacker
    /// has no live hitbox, the boxes do not overlap, the defender is
    /// invulnerable, or this move activation already hit the defender.
    pub fn resolve(
        &mut self,
        attacker: &mut CombatantState,
        defender: &mut CombatantState,
        config: &GameConfig,
    ) -> Option<HitOutcome> {
        let pending = self.check(attacker, defender)?;
        Some(self.apply(pending, attacker, defender, config))
    }

    /// Resolves both ordered pairs of a match against the state at the start
    /// of the resolution step, so simultaneous hits trade.
    pub fn resolve_exchange(
        &mut self,
        combatants: &mut [CombatantState; GameConfig::MAX_COMBATANTS],
        config: &GameConfig,
    ) -> ArrayVec<HitOutcome, { GameConfig::MAX_COMBATANTS }> {
        let [one, two] = combatants;
        let first = self.check(one, two);
        let second = self.check(two, one);

        let mut outcomes = ArrayVec::new();
        if let Some(pending) = first {
            outcomes.push(self.apply(pending, one, two, config));
        }
        if let Some(pending) = second {
            outcomes.push(self.apply(pending, two, one, config));
        }
        outcomes
    }

    /// Forgets registry entries whose move activation is no longer running.
    pub fn prune(&mut self, combatants: &[CombatantState]) {
        self.registry.retain(|(attacker, instance, _)| {
            combatants.iter().any(|combatant| {
                combatant.id == *attacker
                    && combatant.move_instance == *instance
                    && combatant.current_move.is_some()
            })
        });
    }

    pub fn clear(&mut self) {
        self.registry.clear();
    }

    /// Whether this move activation of `attacker` already hit `defender`.
    pub fn has_hit(&self, attacker: PlayerId, instance: u32, defender: PlayerId) -> bool {
        self.registry.contains(&(attacker, instance, defender))
    }

    fn check(&self, attacker: &CombatantState, defender: &CombatantState) -> Option<PendingHit> {
        let hitbox = attacker.hitbox()?;
        let definition = attacker.current_move.as_ref()?;

        if defender.is_invulnerable || defender.is_defeated() {
            return None;
        }
        if self.has_hit(attacker.id, attacker.move_instance, defender.id) {
            return None;
        }
        if !hitbox.intersects(&defender.hurtbox()) {
            return None;
        }

        Some(PendingHit {
            damage: definition.damage,
            knockback: definition.knockback,
            move_name: definition.name.clone(),
            instance: attacker.move_instance,
        })
    }

    fn apply(
        &mut self,
        pending: PendingHit,
        attacker: &mut CombatantState,
        defender: &mut CombatantState,
        config: &GameConfig,
    ) -> HitOutcome {
        let was_blocked = defender.movement == MovementState::Blocking;
        let damage_dealt = if was_blocked {
            pending.damage * config.block_damage_percent / 100
        } else {
            pending.damage
        };
        let displacement = attacker.facing.sign() * pending.knockback;

        defender.receive_hit(damage_dealt, displacement, config);
        defender.gain_meter(config.meter_gain_on_hurt);
        attacker.register_landed_hit();
        attacker.gain_meter(config.meter_gain_on_hit);

        self.registry
            .insert((attacker.id, pending.instance, defender.id));

        HitOutcome {
            attacker: attacker.id,
            defender: defender.id,
            move_name: pending.move_name,
            damage_dealt,
            knockback_applied: displacement,
            was_blocked,
        }
    }
}
