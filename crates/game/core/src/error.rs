//! Common error infrastructure for fight-core.
//!
//! Domain-specific errors (`TransitionError`, `CommandError`, `InputError`) are
//! defined next to the code that produces them. They share the classification
//! below so the runtime can decide how loudly to report a rejection.
//!
//! # Design Principles
//!
//! - **Local**: every core error rejects one command and leaves the
//!   simulation in its last valid state
//! - **Severity Classification**: errors are categorized for reporting

/// Severity level of an error, used for categorization and reporting.
///
/// - **Recoverable**: the command was legal in general but not right now
/// - **Validation**: the command references something that does not exist
/// - **Internal**: an invariant the core maintains by construction was broken
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Rejected because of the current state; the same command may succeed later.
    ///
    /// Examples: attacking while hurt, special move without enough meter
    Recoverable,

    /// Invalid input that will never succeed as given.
    ///
    /// Examples: move name missing from the character's table
    Validation,

    /// Unexpected state inconsistency. These indicate bugs.
    ///
    /// Examples: input history grew past its capacity
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all fight-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for categorization in logs and for assertions in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
