//! Combat data and hit resolution.
//!
//! - [`geometry`]: axis-aligned boxes and facing-aware placement
//! - [`moves`]: frame data, character tables and normal bindings
//! - [`resolver`]: hitbox/hurtbox checks and damage application

pub mod geometry;
pub mod moves;
pub mod resolver;

pub use geometry::Rect;
pub use moves::{CharacterConfig, Lunge, MoveDefinition, MovePhase, NormalBinding};
pub use resolver::{HitOutcome, HitResolver};
