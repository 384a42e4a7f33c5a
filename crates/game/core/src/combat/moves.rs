//! Move and character tables.
//!
//! Characters are plain data: a table of normals, a table of specials and the
//! button bindings that select a normal. Content crates load these from disk.

use super::geometry::Rect;
use crate::input::{ActionKind, MovePattern};

/// Phase of a move given the ticks elapsed since it started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MovePhase {
    Startup,
    Active,
    Recovery,
    Finished,
}

/// Forward momentum a move gives its user while it runs.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lunge {
    /// Horizontal speed along the facing direction, in stage units per tick.
    pub speed: f32,
    /// Ticks from the start of the move during which the speed applies.
    pub ticks: u32,
}

/// Frame data for one attack.
///
/// A move without `meter_cost` and `input` is a normal attack; a special has
/// both.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveDefinition {
    pub name: String,
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub meter_cost: u32,
    pub startup_ticks: u32,
    pub active_ticks: u32,
    pub recovery_ticks: u32,
    /// Owner-relative hitbox, authored for a combatant facing right.
    pub hitbox: Rect,
    pub knockback: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub input: Option<Vec<ActionKind>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lunge: Option<Lunge>,
}

impl MoveDefinition {
    pub fn total_ticks(&self) -> u32 {
        self.startup_ticks + self.active_ticks + self.recovery_ticks
    }

    pub fn phase_at(&self, elapsed: u32) -> MovePhase {
        if elapsed < self.startup_ticks {
            MovePhase::Startup
        } else if elapsed < self.startup_ticks + self.active_ticks {
            MovePhase::Active
        } else if elapsed < self.total_ticks() {
            MovePhase::Recovery
        } else {
            MovePhase::Finished
        }
    }

    /// Hitbox is live iff `startup <= elapsed < startup + active`.
    #[inline]
    pub fn is_active_at(&self, elapsed: u32) -> bool {
        self.phase_at(elapsed) == MovePhase::Active
    }

    pub fn is_special(&self) -> bool {
        self.input.is_some()
    }

    pub fn pattern(&self) -> Option<MovePattern> {
        self.input
            .as_ref()
            .map(|sequence| MovePattern::new(self.name.clone(), sequence.clone()))
    }
}

/// Selects a normal attack for a button, optionally only while a direction is
/// held (`Forward` + `Punch` for a heavy punch).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalBinding {
    pub button: ActionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub with: Option<ActionKind>,
    #[cfg_attr(feature = "serde", serde(rename = "move"))]
    pub move_name: String,
}

/// Static description of a playable character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterConfig {
    pub id: String,
    pub name: String,
    pub max_health: u32,
    pub max_meter: u32,
    pub walk_speed: f32,
    /// Initial vertical velocity of a jump (negative is upwards).
    pub jump_force: f32,
    /// Body box relative to the combatant's position.
    pub hurtbox: Rect,
    pub normals: Vec<MoveDefinition>,
    pub specials: Vec<MoveDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bindings: Vec<NormalBinding>,
}

impl CharacterConfig {
    /// Looks a move up by name in the normals, then the specials.
    pub fn find_move(&self, name: &str) -> Option<&MoveDefinition> {
        self.normals
            .iter()
            .chain(self.specials.iter())
            .find(|definition| definition.name == name)
    }

    pub fn special(&self, name: &str) -> Option<&MoveDefinition> {
        self.specials.iter().find(|definition| definition.name == name)
    }

    /// Normal attack bound to `button`.
    ///
    /// A binding qualified by a held direction takes precedence over the plain
    /// one when that direction is held.
    pub fn normal_for(&self, button: ActionKind, held: Option<ActionKind>) -> Option<&MoveDefinition> {
        let qualified = held.and_then(|direction| {
            self.bindings
                .iter()
                .find(|binding| binding.button == button && binding.with == Some(direction))
        });
        let binding = qualified.or_else(|| {
            self.bindings
                .iter()
                .find(|binding| binding.button == button && binding.with.is_none())
        })?;
        self.normals
            .iter()
            .find(|definition| definition.name == binding.move_name)
    }

    /// Special-move patterns in declaration order.
    pub fn patterns(&self) -> Vec<MovePattern> {
        self.specials.iter().filter_map(MoveDefinition::pattern).collect()
    }
}
