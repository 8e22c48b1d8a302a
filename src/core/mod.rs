//! Core declaration and property types.
//!
//! This module contains the static side of the machine:
//! - State declarations and the per-machine-type registry
//! - Property bags and the field-level deep merge
//! - The transition log
//!
//! Everything here is read-only during transitions except the log; the
//! mutable per-instance state lives in [`crate::machine`].

mod declaration;
mod history;
mod overlay;

pub use declaration::{MachineDefinition, StateDeclaration, INITIAL_STATE};
pub use history::{TransitionLog, TransitionRecord};
pub use overlay::{merge_into, Properties};
