use crate::combatant::TransitionError;
use crate::error::{ErrorSeverity, GameError};

/// Discrete instruction for one combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Starts a normal attack by name.
    Attack { name: String },
    /// Starts a special move by name.
    Special { name: String },
    /// Starts any move by name, normal or special.
    Perform { name: String },
    /// Walks left (`-1`) or right (`+1`).
    Walk { direction: f32 },
    /// Stops walking; a no-op in any other state.
    Stop,
    Jump,
    /// Raises or lowers the guard.
    Block { raise: bool },
}

impl Command {
    pub fn perform(name: impl Into<String>) -> Self {
        Self::Perform { name: name.into() }
    }
}

/// Why a command was rejected. Rejections never stop the match.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("move '{name}' is not in the character's table")]
    UnknownMove { name: String },
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Transition(err) => err.severity(),
            Self::UnknownMove { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Transition(err) => err.error_code(),
            Self::UnknownMove { .. } => "UNKNOWN_MOVE",
        }
    }
}
