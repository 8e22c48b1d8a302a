//! Builder API for constructing machine instances.
//!
//! Construction is the one place configuration errors surface: a machine
//! with no definition, no permitted initial transitions, or a non-object
//! property bag is unusable, so [`StateMachineBuilder::build`] refuses to
//! produce one.

pub mod error;
pub mod macros;

pub use error::BuildError;

use crate::core::{MachineDefinition, Properties};
use crate::machine::StateMachine;
use serde_json::Value;
use std::sync::Arc;

/// Builder for [`StateMachine`] instances with a fluent API.
///
/// # Example
///
/// ```rust
/// use stance::{MachineDefinition, StateDeclaration, StateMachineBuilder};
/// use serde_json::json;
///
/// let mut def = MachineDefinition::new();
/// def.declare(
///     "On",
///     StateDeclaration::new("initial", ["Off"]).overlay(json!({"power": true})),
/// );
/// def.declare(
///     "Off",
///     StateDeclaration::new("initial", ["On"]).overlay(json!({"power": false})),
/// );
///
/// let machine = StateMachineBuilder::new()
///     .definition(def)
///     .initial_transition("On")
///     .props(json!({"power": false}))
///     .build()
///     .unwrap();
///
/// assert!(machine.is_initial_state());
/// ```
#[derive(Default)]
pub struct StateMachineBuilder {
    definition: Option<Arc<MachineDefinition>>,
    initial_transitions: Vec<String>,
    props: Option<Value>,
    logging: bool,
}

impl StateMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared machine-type definition (required).
    ///
    /// Accepts either a bare [`MachineDefinition`] or an
    /// `Arc<MachineDefinition>` already shared with other instances.
    pub fn definition(mut self, definition: impl Into<Arc<MachineDefinition>>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    /// Append one permitted transition out of the initial state.
    pub fn initial_transition(mut self, state: impl Into<String>) -> Self {
        self.initial_transitions.push(state.into());
        self
    }

    /// Append several permitted transitions out of the initial state.
    pub fn initial_transitions<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_transitions
            .extend(states.into_iter().map(Into::into));
        self
    }

    /// Set the initial property values (optional, defaults to empty).
    ///
    /// Must be a JSON object; anything else fails at
    /// [`build`](Self::build).
    pub fn props(mut self, props: Value) -> Self {
        self.props = Some(props);
        self
    }

    /// Enable diagnostic logging of rejected and applied transitions
    /// (default off). A side channel only; never affects return values.
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// Build the machine.
    ///
    /// The machine starts in the sentinel initial state with its property
    /// bag equal to the deep-copied initial values.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let definition = self.definition.ok_or(BuildError::MissingDefinition)?;

        if self.initial_transitions.is_empty() {
            return Err(BuildError::NoInitialTransitions);
        }

        let props = match self.props {
            None => Properties::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(BuildError::PropsNotAnObject {
                    found: json_kind(&other),
                })
            }
        };

        Ok(StateMachine::new(
            definition,
            self.initial_transitions,
            props,
            self.logging,
        ))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
