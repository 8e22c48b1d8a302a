//! The machine instance and its transition engine.
//!
//! [`StateMachine`] owns the live property bag and the per-instance store,
//! and shares a read-only [`MachineDefinition`](crate::MachineDefinition)
//! with every other instance of its type. The engine is synchronous and
//! cooperative: lifecycle hooks run to completion inline before
//! [`transit_to`](StateMachine::transit_to) returns.
//!
//! The machine uses interior mutability so a hook holding an
//! `Rc<StateMachine>` can query it mid-transition; a nested `transit_to`
//! from inside a hook is a programming error and panics.

mod error;
mod store;

pub use error::TransitionError;
pub use store::CallbackId;

use crate::core::{
    merge_into, MachineDefinition, Properties, StateDeclaration, TransitionLog, TransitionRecord,
    INITIAL_STATE,
};
use serde_json::Value;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use store::InstanceStore;

/// A machine instance: current state, live properties, lifecycle hooks.
///
/// Built with [`StateMachineBuilder`](crate::StateMachineBuilder). The
/// instance starts in the sentinel `"initial"` state with its properties
/// equal to the configured initial values; every successful transition
/// resets the bag to that snapshot and merges the target's inherited
/// overlay chain on top.
///
/// # Example
///
/// ```rust
/// use stance::{StateMachineBuilder, declare_states};
/// use serde_json::json;
///
/// let def = declare_states! {
///     state Red {
///         parent: initial,
///         next: [Green],
///         props: { "message": "STOP" },
///     }
///     state Green {
///         parent: initial,
///         next: [Red],
///         props: { "message": "GO", "safe": true },
///     }
/// };
///
/// let machine = StateMachineBuilder::new()
///     .definition(def)
///     .initial_transition("Green")
///     .props(json!({"message": "OFF", "safe": false}))
///     .build()
///     .unwrap();
///
/// machine.transit_to("Green", &[]).unwrap();
/// assert_eq!(machine.current_state(), "Green");
/// assert_eq!(machine.prop("message"), Some(json!("GO")));
///
/// // Red's overlay does not set `safe`, so it falls back to the snapshot.
/// machine.transit_to("Red", &[]).unwrap();
/// assert_eq!(machine.prop("safe"), Some(json!(false)));
/// ```
pub struct StateMachine {
    definition: Arc<MachineDefinition>,
    initial_transitions: Vec<String>,
    store: RefCell<InstanceStore>,
    props: RefCell<Properties>,
    log: RefCell<TransitionLog>,
    in_transition: Cell<bool>,
    logging: bool,
}

/// Clears the in-flight flag on scope exit, unwinding included.
struct TransitGuard<'a>(&'a Cell<bool>);

impl Drop for TransitGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl StateMachine {
    pub(crate) fn new(
        definition: Arc<MachineDefinition>,
        initial_transitions: Vec<String>,
        props: Properties,
        logging: bool,
    ) -> Self {
        let snapshot = props.clone();
        Self {
            definition,
            initial_transitions,
            store: RefCell::new(InstanceStore::new(snapshot)),
            props: RefCell::new(props),
            log: RefCell::new(TransitionLog::new()),
            in_transition: Cell::new(false),
            logging,
        }
    }

    /// Request a transition to `target`, forwarding `args` to enter hooks.
    ///
    /// On success the machine is in `target`, the property bag holds the
    /// snapshot plus `target`'s inherited overlay chain, and hooks have run
    /// in order: leave hooks for the old state (before any mutation), then
    /// enter hooks for `target` (after state and properties are visible).
    ///
    /// On `Err` nothing changed: not the state, not the properties, not the
    /// log.
    ///
    /// # Panics
    ///
    /// Panics when called from inside an active enter or leave hook
    /// (recursive transition), and when `target`'s parent chain references
    /// an undeclared state or loops. Both are programming errors, not
    /// conditions to branch on.
    pub fn transit_to(&self, target: &str, args: &[Value]) -> Result<(), TransitionError> {
        if self.in_transition.get() {
            panic!(
                "recursive transition: transit_to('{target}') called from inside \
                 an active transition callback"
            );
        }
        self.in_transition.set(true);
        let _guard = TransitGuard(&self.in_transition);

        // An unknown target is a recoverable condition. The sentinel resolves
        // to the bare snapshot and so needs no declaration.
        if target != INITIAL_STATE && !self.definition.contains(target) {
            if self.logging {
                tracing::warn!("transition rejected: state '{}' is not registered", target);
            }
            return Err(TransitionError::StateNotRegistered {
                state: target.to_owned(),
            });
        }

        let current = self.store.borrow().current().to_owned();
        let allowed = if current == INITIAL_STATE {
            self.initial_transitions.iter().any(|s| s == target)
        } else {
            self.current_declaration(&current).permits(target)
        };
        if !allowed {
            if self.logging {
                tracing::warn!(
                    "transition rejected: '{}' -> '{}' is not permitted",
                    current,
                    target
                );
            }
            return Err(TransitionError::InvalidTransition {
                from: current,
                to: target.to_owned(),
            });
        }

        // The target's overlay chain, base -> most specific. An unknown
        // ancestor panics inside overlay_chain.
        let chain: Vec<&Properties> = if target == INITIAL_STATE {
            Vec::new()
        } else {
            self.definition.overlay_chain(target)
        };

        // Leave hooks observe the pre-transition property values.
        let leave_hooks = self.store.borrow().leave_hooks(&current);
        for hook in leave_hooks {
            (hook.borrow_mut())(target);
        }

        {
            let snapshot = self.store.borrow().snapshot().clone();
            let mut props = self.props.borrow_mut();
            *props = snapshot;
            for overlay in &chain {
                merge_into(&mut props, overlay);
            }
        }

        self.store.borrow_mut().set_current(target);
        self.log
            .borrow_mut()
            .record(TransitionRecord::now(current.clone(), target));

        let enter_hooks = self.store.borrow().enter_hooks(target);
        for hook in enter_hooks {
            (hook.borrow_mut())(&current, args);
        }

        if self.logging {
            tracing::debug!("transition applied: '{}' -> '{}'", current, target);
        }
        Ok(())
    }

    /// The live current state name.
    pub fn current_state(&self) -> String {
        self.store.borrow().current().to_owned()
    }

    /// Whether the machine is currently in `name`.
    pub fn is(&self, name: &str) -> bool {
        self.store.borrow().current() == name
    }

    /// Whether the machine is still in the sentinel initial state.
    pub fn is_initial_state(&self) -> bool {
        self.store.borrow().is_initial()
    }

    /// Whether a transition to `name` would pass validation right now.
    pub fn can(&self, name: &str) -> bool {
        self.permitted_targets().iter().any(|s| s == name)
    }

    /// The targets permitted from the current state: the configured initial
    /// transitions while in the initial state, the current declaration's
    /// `next` list otherwise. The returned list is a snapshot, not a live
    /// view.
    pub fn transitions(&self) -> Vec<String> {
        self.permitted_targets()
    }

    fn permitted_targets(&self) -> Vec<String> {
        let store = self.store.borrow();
        if store.is_initial() {
            self.initial_transitions.clone()
        } else {
            self.current_declaration(store.current()).next.clone()
        }
    }

    /// The machine got into `current` through a transition, so a missing
    /// declaration here means the registry was corrupted after the fact.
    fn current_declaration(&self, current: &str) -> &StateDeclaration {
        self.definition.get(current).unwrap_or_else(|| {
            panic!("current state '{current}' has no declaration in the machine definition")
        })
    }

    /// Read access to the live property bag.
    ///
    /// The returned guard borrows the bag; drop it before the next
    /// transition.
    pub fn props(&self) -> Ref<'_, Properties> {
        self.props.borrow()
    }

    /// A copy of one live property value.
    pub fn prop(&self, key: &str) -> Option<Value> {
        self.props.borrow().get(key).cloned()
    }

    /// The log of completed transitions.
    pub fn log(&self) -> Ref<'_, TransitionLog> {
        self.log.borrow()
    }

    /// The shared machine-type definition.
    pub fn definition(&self) -> &MachineDefinition {
        &self.definition
    }

    /// Register an enter hook for `state`.
    ///
    /// Hooks for a state run in registration order after a transition into
    /// it completes, each receiving the previous state name and the extra
    /// arguments passed to [`transit_to`](Self::transit_to).
    pub fn on_enter<F>(&self, state: &str, hook: F) -> CallbackId
    where
        F: FnMut(&str, &[Value]) + 'static,
    {
        self.store
            .borrow_mut()
            .register_enter(state, Rc::new(RefCell::new(hook)))
    }

    /// Register a leave hook for `state`.
    ///
    /// Hooks run in registration order before a transition out of `state`
    /// mutates anything, each receiving the target state name.
    pub fn on_leave<F>(&self, state: &str, hook: F) -> CallbackId
    where
        F: FnMut(&str) + 'static,
    {
        self.store
            .borrow_mut()
            .register_leave(state, Rc::new(RefCell::new(hook)))
    }

    /// Remove exactly the hook registered under `id`. Other hooks for the
    /// same state and phase keep their relative order. Returns whether a
    /// hook was removed.
    pub fn unsubscribe(&self, id: CallbackId) -> bool {
        self.store.borrow_mut().remove(id)
    }
}
