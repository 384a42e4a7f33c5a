//! Per-fighter state and its tick-driven state machine.
//!
//! A [`CombatantState`] is owned by the match. It changes only through the
//! transition methods below, the physics step and the hit resolver. Every
//! movement-state change is journaled so the match clock can report it.
mod error;
pub mod physics;

pub use error::{Intent, TransitionError};

use crate::combat::{CharacterConfig, MoveDefinition, MovePhase, Rect};
use crate::config::GameConfig;
use crate::state::{Facing, PlayerId, Vec2};

/// High-level state of a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MovementState {
    #[default]
    Idle,
    Walking,
    Jumping,
    Attacking,
    SpecialAttacking,
    Hurt,
    Blocking,
    Victorious,
    Defeated,
}

impl MovementState {
    /// Terminal states are only left through a round reset.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Victorious | Self::Defeated)
    }

    #[inline]
    pub const fn is_attacking(self) -> bool {
        matches!(self, Self::Attacking | Self::SpecialAttacking)
    }

    /// States in which a normal attack may start. Attacking out of a guard
    /// drops it.
    #[inline]
    pub const fn can_attack(self) -> bool {
        matches!(self, Self::Idle | Self::Walking | Self::Jumping | Self::Blocking)
    }

    /// States in which a special may start; meter is checked afterwards.
    #[inline]
    pub const fn can_special(self) -> bool {
        !matches!(
            self,
            Self::Attacking | Self::SpecialAttacking | Self::Hurt | Self::Defeated | Self::Victorious
        )
    }
}

/// One recorded movement-state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateTransition {
    pub from: MovementState,
    pub to: MovementState,
}

/// Live state of one fighter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantState {
    pub id: PlayerId,
    pub character: String,

    pub health: u32,
    pub max_health: u32,
    pub meter: u32,
    pub max_meter: u32,

    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
    pub grounded: bool,

    pub movement: MovementState,
    pub current_move: Option<MoveDefinition>,
    pub move_elapsed_ticks: u32,
    /// Increments every time a move starts; identifies the activation for the
    /// one-hit-per-move rule.
    pub move_instance: u32,
    move_started_this_tick: bool,

    pub is_invulnerable: bool,
    pub invulnerability_remaining_ticks: u32,
    pub hurt_remaining_ticks: u32,

    pub combo_count: u32,
    pub ticks_since_last_hit: u32,

    walk_speed: f32,
    jump_force: f32,
    body: Rect,

    #[cfg_attr(feature = "serde", serde(skip))]
    journal: Vec<StateTransition>,
}

impl CombatantState {
    pub fn new(id: PlayerId, character: &CharacterConfig, spawn: Vec2, facing: Facing) -> Self {
        Self {
            id,
            character: character.id.clone(),
            health: character.max_health,
            max_health: character.max_health,
            meter: 0,
            max_meter: character.max_meter,
            position: spawn,
            velocity: Vec2::ZERO,
            facing,
            grounded: true,
            movement: MovementState::Idle,
            current_move: None,
            move_elapsed_ticks: 0,
            move_instance: 0,
            move_started_this_tick: false,
            is_invulnerable: false,
            invulnerability_remaining_ticks: 0,
            hurt_remaining_ticks: 0,
            combo_count: 0,
            ticks_since_last_hit: 0,
            walk_speed: character.walk_speed,
            jump_force: character.jump_force,
            body: character.hurtbox,
            journal: Vec::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_defeated(&self) -> bool {
        self.movement == MovementState::Defeated
    }

    /// Phase of the current move, if one is running.
    pub fn move_phase(&self) -> Option<MovePhase> {
        self.current_move
            .as_ref()
            .map(|definition| definition.phase_at(self.move_elapsed_ticks))
    }

    /// Stage-space hitbox, present only while the current move is active.
    pub fn hitbox(&self) -> Option<Rect> {
        if !self.movement.is_attacking() {
            return None;
        }
        let definition = self.current_move.as_ref()?;
        definition
            .is_active_at(self.move_elapsed_ticks)
            .then(|| definition.hitbox.placed(self.position, self.facing))
    }

    /// Stage-space hurtbox. Always present.
    pub fn hurtbox(&self) -> Rect {
        self.body.placed(self.position, self.facing)
    }

    /// Drains the movement-state changes recorded since the last call.
    pub fn take_transitions(&mut self) -> Vec<StateTransition> {
        std::mem::take(&mut self.journal)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Starts a normal attack.
    pub fn begin_attack(&mut self, definition: &MoveDefinition) -> Result<(), TransitionError> {
        if !self.movement.can_attack() {
            return Err(self.reject(Intent::Attack));
        }
        self.start_move(definition, MovementState::Attacking);
        Ok(())
    }

    /// Starts a special move, deducting its meter cost.
    ///
    /// The state guard is checked before the meter, and nothing is deducted
    /// when either check fails.
    pub fn begin_special(&mut self, definition: &MoveDefinition) -> Result<(), TransitionError> {
        if !self.movement.can_special() {
            return Err(self.reject(Intent::Special));
        }
        if self.meter < definition.meter_cost {
            return Err(TransitionError::InsufficientMeter {
                required: definition.meter_cost,
                available: self.meter,
            });
        }
        self.meter -= definition.meter_cost;
        self.start_move(definition, MovementState::SpecialAttacking);
        Ok(())
    }

    /// Walks towards `direction` (`-1` left, `+1` right) at the character's
    /// walk speed.
    pub fn walk(&mut self, direction: f32) -> Result<(), TransitionError> {
        if !matches!(self.movement, MovementState::Idle | MovementState::Walking) {
            return Err(self.reject(Intent::Walk));
        }
        self.velocity.x = direction.signum() * self.walk_speed;
        self.set_movement(MovementState::Walking);
        Ok(())
    }

    /// Stops walking. No-op in any other state.
    pub fn stop(&mut self) {
        if self.movement == MovementState::Walking {
            self.velocity.x = 0.0;
            self.set_movement(MovementState::Idle);
        }
    }

    pub fn jump(&mut self) -> Result<(), TransitionError> {
        if !self.grounded || !matches!(self.movement, MovementState::Idle | MovementState::Walking) {
            return Err(self.reject(Intent::Jump));
        }
        self.velocity.y = self.jump_force;
        self.grounded = false;
        self.set_movement(MovementState::Jumping);
        Ok(())
    }

    /// Raises or lowers the guard.
    pub fn block(&mut self, raise: bool) -> Result<(), TransitionError> {
        if !raise {
            if self.movement == MovementState::Blocking {
                self.set_movement(MovementState::Idle);
            }
            return Ok(());
        }
        match self.movement {
            MovementState::Blocking => Ok(()),
            MovementState::Idle | MovementState::Walking if self.grounded => {
                self.velocity.x = 0.0;
                self.set_movement(MovementState::Blocking);
                Ok(())
            }
            _ => Err(self.reject(Intent::Block)),
        }
    }

    /// Turns towards `target_x` while grounded and in a neutral state.
    pub fn face_towards(&mut self, target_x: f32) {
        if self.grounded
            && matches!(
                self.movement,
                MovementState::Idle | MovementState::Walking | MovementState::Blocking
            )
        {
            self.facing = self.facing.towards(self.position.x, target_x);
        }
    }

    pub fn gain_meter(&mut self, amount: u32) {
        self.meter = self.meter.saturating_add(amount).min(self.max_meter);
    }

    // ========================================================================
    // Hit application (driven by the resolver)
    // ========================================================================

    /// Applies a landed hit: damage, displacement, stun and invulnerability.
    ///
    /// Cancels the current move, so its hitbox disappears immediately.
    pub(crate) fn receive_hit(
        &mut self,
        damage: u32,
        displacement: f32,
        config: &GameConfig,
    ) {
        self.health = self.health.saturating_sub(damage);
        self.position.x += displacement;
        self.velocity.x = 0.0;
        self.cancel_move();
        self.hurt_remaining_ticks = config.hurt_stun_ticks;
        self.is_invulnerable = config.invulnerability_ticks > 0;
        self.invulnerability_remaining_ticks = config.invulnerability_ticks;
        self.set_movement(MovementState::Hurt);
    }

    pub(crate) fn register_landed_hit(&mut self) {
        self.combo_count += 1;
        self.ticks_since_last_hit = 0;
    }

    // ========================================================================
    // Tick processing
    // ========================================================================

    /// Advances timers by one tick.
    ///
    /// A move started during this tick's command phase is not advanced until
    /// the next tick, so a move started at tick `s` has `elapsed = t - s` at
    /// tick `t`.
    pub fn advance(&mut self, config: &GameConfig) {
        if self.invulnerability_remaining_ticks > 0 {
            self.invulnerability_remaining_ticks -= 1;
        }
        self.is_invulnerable = self.invulnerability_remaining_ticks > 0;

        self.ticks_since_last_hit = self.ticks_since_last_hit.saturating_add(1);
        if self.ticks_since_last_hit > config.combo_window_ticks {
            self.combo_count = 0;
        }

        match self.movement {
            MovementState::Attacking | MovementState::SpecialAttacking => self.advance_move(),
            MovementState::Hurt => {
                self.hurt_remaining_ticks = self.hurt_remaining_ticks.saturating_sub(1);
                if self.hurt_remaining_ticks == 0 {
                    self.set_movement(self.neutral_state());
                }
            }
            _ => {}
        }
    }

    fn advance_move(&mut self) {
        if std::mem::take(&mut self.move_started_this_tick) {
            self.apply_lunge();
            return;
        }
        self.move_elapsed_ticks += 1;

        let finished = self
            .current_move
            .as_ref()
            .is_none_or(|definition| self.move_elapsed_ticks >= definition.total_ticks());
        if finished {
            self.cancel_move();
            if self.grounded {
                self.velocity.x = 0.0;
            }
            self.set_movement(self.neutral_state());
        } else {
            self.apply_lunge();
        }
    }

    fn apply_lunge(&mut self) {
        let Some(lunge) = self.current_move.as_ref().and_then(|definition| definition.lunge) else {
            return;
        };
        self.velocity.x = if self.move_elapsed_ticks < lunge.ticks {
            self.facing.sign() * lunge.speed
        } else {
            0.0
        };
    }

    /// Called once the combatant touches the ground after being airborne.
    pub(crate) fn land(&mut self) {
        self.grounded = true;
        if self.movement == MovementState::Jumping {
            self.velocity.x = 0.0;
            self.set_movement(MovementState::Idle);
        }
    }

    /// Enters `Defeated` when health reached zero. Returns whether it did.
    pub fn check_defeat(&mut self) -> bool {
        if self.health > 0 || self.is_defeated() {
            return false;
        }
        self.cancel_move();
        self.velocity.x = 0.0;
        self.set_movement(MovementState::Defeated);
        true
    }

    pub fn declare_victory(&mut self) {
        self.cancel_move();
        self.velocity.x = 0.0;
        self.set_movement(MovementState::Victorious);
    }

    /// Restores the combatant for a new round at `spawn`.
    pub fn reset(&mut self, spawn: Vec2, facing: Facing) {
        self.health = self.max_health;
        self.meter = 0;
        self.position = spawn;
        self.velocity = Vec2::ZERO;
        self.facing = facing;
        self.grounded = true;
        self.cancel_move();
        self.is_invulnerable = false;
        self.invulnerability_remaining_ticks = 0;
        self.hurt_remaining_ticks = 0;
        self.combo_count = 0;
        self.ticks_since_last_hit = 0;
        self.set_movement(MovementState::Idle);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn start_move(&mut self, definition: &MoveDefinition, state: MovementState) {
        self.current_move = Some(definition.clone());
        self.move_elapsed_ticks = 0;
        self.move_instance = self.move_instance.wrapping_add(1);
        self.move_started_this_tick = true;
        if self.grounded {
            self.velocity.x = 0.0;
        }
        self.set_movement(state);
    }

    fn cancel_move(&mut self) {
        self.current_move = None;
        self.move_elapsed_ticks = 0;
        self.move_started_this_tick = false;
    }

    fn neutral_state(&self) -> MovementState {
        if self.grounded {
            MovementState::Idle
        } else {
            MovementState::Jumping
        }
    }

    fn set_movement(&mut self, to: MovementState) {
        let from = self.movement;
        if from != to {
            self.movement = to;
            self.journal.push(StateTransition { from, to });
        }
    }

    fn reject(&self, intent: Intent) -> TransitionError {
        TransitionError::InvalidTransition {
            from: self.movement,
            intent,
        }
    }
}
