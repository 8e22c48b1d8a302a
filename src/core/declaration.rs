//! State declarations and the per-machine-type registry.
//!
//! A machine type is described by a [`MachineDefinition`]: a mapping from
//! state name to its declared metadata — parent state, permitted next
//! states, and the property overlay merged in when the state becomes
//! active. Definitions are built once, then shared read-only across every
//! instance of the machine type (typically behind an `Arc`).

use super::overlay::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Name of the sentinel initial state.
///
/// Every machine starts here, and every parent chain terminates here. It is
/// the root of the inheritance hierarchy and carries no declaration of its
/// own — its "overlay" is the machine's initial property snapshot.
pub const INITIAL_STATE: &str = "initial";

/// Static metadata attached to a named state.
///
/// Declarations are immutable after definition time. The `next` list keeps
/// declaration order; [`MachineDefinition::declare`] applies last-writer-wins
/// on re-declaration.
///
/// # Example
///
/// ```rust
/// use stance::StateDeclaration;
/// use serde_json::json;
///
/// let red = StateDeclaration::new("initial", ["Green"])
///     .overlay(json!({"message": "STOP"}));
///
/// assert_eq!(red.parent, "initial");
/// assert!(red.permits("Green"));
/// assert!(!red.permits("Orange"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDeclaration {
    /// Parent state name; `"initial"` for roots of the hierarchy.
    pub parent: String,
    /// Permitted next states, in declaration order.
    pub next: Vec<String>,
    /// Partial property values merged in when this state becomes active.
    #[serde(default)]
    pub overlay: Properties,
}

impl StateDeclaration {
    /// Create a declaration with an empty overlay.
    pub fn new<P, I, S>(parent: P, next: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parent: parent.into(),
            next: next.into_iter().map(Into::into).collect(),
            overlay: Properties::new(),
        }
    }

    /// Attach the property overlay for this state.
    ///
    /// # Panics
    ///
    /// Panics if `props` is not a JSON object. Overlays are partial property
    /// bags; scalar or array overlays have no merge meaning.
    pub fn overlay(mut self, props: Value) -> Self {
        match props {
            Value::Object(map) => {
                self.overlay = map;
                self
            }
            other => panic!("state overlay must be a JSON object, got {}", kind_of(&other)),
        }
    }

    /// Whether `target` appears in this state's permitted next states.
    pub fn permits(&self, target: &str) -> bool {
        self.next.iter().any(|s| s == target)
    }
}

/// The state declaration registry for one machine type.
///
/// Populated at definition time via [`declare`](Self::declare), read-only
/// thereafter during transitions. There is no eager validation pass: a
/// `next` entry or `parent` naming an undeclared state only surfaces at
/// transition time.
///
/// # Example
///
/// ```rust
/// use stance::{MachineDefinition, StateDeclaration};
/// use serde_json::json;
///
/// let mut def = MachineDefinition::new();
/// def.declare(
///     "Red",
///     StateDeclaration::new("initial", ["Green"]).overlay(json!({"message": "STOP"})),
/// );
/// def.declare(
///     "Green",
///     StateDeclaration::new("initial", ["Red"]).overlay(json!({"message": "GO"})),
/// );
///
/// assert!(def.get("Red").is_some());
/// assert!(def.get("Blue").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    states: HashMap<String, StateDeclaration>,
}

impl MachineDefinition {
    /// Create an empty definition.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Load a definition from a JSON document.
    ///
    /// The document maps state names to declarations:
    ///
    /// ```rust
    /// use stance::MachineDefinition;
    /// use serde_json::json;
    ///
    /// let def = MachineDefinition::from_json(&json!({
    ///     "states": {
    ///         "Red":   {"parent": "initial", "next": ["Green"], "overlay": {"message": "STOP"}},
    ///         "Green": {"parent": "initial", "next": ["Red"],   "overlay": {"message": "GO"}}
    ///     }
    /// })).unwrap();
    ///
    /// assert_eq!(def.get("Green").unwrap().next, vec!["Red"]);
    /// ```
    pub fn from_json(json: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(json.clone())
    }

    /// Record a declaration, silently overwriting any earlier one for the
    /// same name (last writer wins).
    pub fn declare(&mut self, name: impl Into<String>, decl: StateDeclaration) {
        self.states.insert(name.into(), decl);
    }

    /// Look up a declaration by state name.
    pub fn get(&self, name: &str) -> Option<&StateDeclaration> {
        self.states.get(name)
    }

    /// Whether `name` has a declaration.
    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Declared state names, sorted for stable iteration.
    pub fn state_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.states.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no states are declared.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Resolve the overlay chain for `target`: the target's own overlay plus
    /// every ancestor's, ordered base → most specific. Callers merge these
    /// onto the initial snapshot in order, so target-specific fields win.
    ///
    /// # Panics
    ///
    /// Panics if the parent chain references an undeclared state or loops
    /// back on itself — the hierarchy is corrupt, not merely the request
    /// invalid. Callers wanting a recoverable answer must check
    /// [`get`](Self::get) for the target first.
    pub fn overlay_chain(&self, target: &str) -> Vec<&Properties> {
        let mut chain = Vec::new();
        let mut visited: Vec<&str> = Vec::new();
        let mut name = target;
        loop {
            if visited.contains(&name) {
                panic!("cyclic parent chain while resolving '{target}': revisited '{name}'");
            }
            visited.push(name);
            let decl = self.get(name).unwrap_or_else(|| {
                panic!(
                    "broken state hierarchy: '{name}' is referenced in the parent chain \
                     of '{target}' but was never declared"
                )
            });
            chain.push(&decl.overlay);
            if decl.parent == INITIAL_STATE {
                break;
            }
            name = &decl.parent;
        }
        chain.reverse();
        chain
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
