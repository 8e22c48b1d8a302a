//! Build errors for machine construction.

use thiserror::Error;

/// Configuration errors detected when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no machine definition supplied. Call .definition(def) before .build()")]
    MissingDefinition,

    #[error("initial transitions must not be empty. Call .initial_transition(state)")]
    NoInitialTransitions,

    #[error("initial props must be a JSON object, got {found}")]
    PropsNotAnObject { found: &'static str },
}
