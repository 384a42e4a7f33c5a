//! Content validation errors.

use fight_core::ActionKind;

/// A character table that would load but cannot be played as written.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("character '{character}' has no move named '{name}' (bound to {button})")]
    UnknownBindingTarget {
        character: String,
        button: ActionKind,
        name: String,
    },

    #[error("character '{character}' declares '{name}' more than once")]
    DuplicateMove { character: String, name: String },

    #[error("normal '{name}' of '{character}' carries an input pattern or a meter cost")]
    NormalWithSpecialData { character: String, name: String },

    #[error("special '{name}' of '{character}' has no input pattern")]
    MissingPattern { character: String, name: String },

    #[error("pattern of '{name}' ({len} inputs) cannot fit a history of {capacity}")]
    PatternTooLong {
        name: String,
        len: usize,
        capacity: usize,
    },

    #[error("pattern of '{name}' must end with an attack button")]
    PatternWithoutButton { name: String },

    #[error("move '{name}' has no active ticks")]
    NoActiveWindow { name: String },

    #[error("special '{name}' costs {cost} but '{character}' holds at most {max_meter}")]
    Unaffordable {
        character: String,
        name: String,
        cost: u32,
        max_meter: u32,
    },

    #[error("unknown character '{id}'")]
    UnknownCharacter { id: String },
}
