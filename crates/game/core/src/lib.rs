//! Deterministic combat rules and data types shared across the fight crates.
//!
//! `fight-core` defines the canonical simulation (input buffering, move
//! frames, hit resolution, match flow) and exposes pure APIs that are reused
//! by the runtime, the headless client and offline replay tools. All state
//! mutation flows through [`engine::MatchClock`], and supporting crates depend
//! on the types re-exported here.
pub mod combat;
pub mod combatant;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod state;

#[cfg(test)]
mod testing;

pub use combat::{
    CharacterConfig, HitOutcome, HitResolver, Lunge, MoveDefinition, MovePhase, NormalBinding,
    Rect,
};
pub use combatant::{CombatantState, Intent, MovementState, StateTransition, TransitionError};
pub use config::GameConfig;
pub use engine::{
    Command, CommandError, InputEvent, InputLog, LoggedInput, MatchClock, MatchEvent,
    MatchListener, MatchSetup, TickReport, replay,
};
pub use error::{ErrorSeverity, GameError};
pub use input::{
    Action, ActionKind, Bindings, BufferClearPolicy, Control, Controls, DeviceInput, InputError,
    InputHistory, InputSampler, InputSequenceMatcher, MovePattern,
};
pub use state::{Facing, MatchMode, MatchPhase, MatchResult, MatchState, PlayerId, Tick, Vec2};
