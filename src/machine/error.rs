//! Rejected-transition conditions.

use thiserror::Error;

/// Conditions under which a requested transition is rejected.
///
/// Both variants are recoverable: the machine's state and properties are
/// left untouched and the caller may retry with a different target.
/// Programming errors — re-entrant transitions, broken parent chains —
/// panic instead; they are not represented here.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The target is declared but not permitted from the current state.
    #[error("invalid transition: '{to}' is not permitted from '{from}'")]
    InvalidTransition { from: String, to: String },

    /// The target has no declaration on this machine.
    #[error("state not registered: '{state}' has no declaration on this machine")]
    StateNotRegistered { state: String },
}
