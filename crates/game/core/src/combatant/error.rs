use super::MovementState;
use crate::error::{ErrorSeverity, GameError};

/// What a rejected command tried to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    Attack,
    Special,
    Walk,
    Jump,
    Block,
}

/// Rejections of combatant state-machine commands. The state is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionError {
    #[error("cannot {intent} while {from}")]
    InvalidTransition {
        from: MovementState,
        intent: Intent,
    },

    #[error("special needs {required} meter, {available} available")]
    InsufficientMeter { required: u32, available: u32 },
}

impl GameError for TransitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InsufficientMeter { .. } => "INSUFFICIENT_METER",
        }
    }
}
