//! Per-instance transition store.
//!
//! One store per machine instance, never shared and never exposed: the
//! current state name, the frozen initial property snapshot, and the
//! registered lifecycle hooks keyed by state name.

use crate::core::{Properties, INITIAL_STATE};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identity handle for a registered lifecycle hook.
///
/// Returned by [`StateMachine::on_enter`](crate::StateMachine::on_enter) and
/// [`StateMachine::on_leave`](crate::StateMachine::on_leave); passing it to
/// [`StateMachine::unsubscribe`](crate::StateMachine::unsubscribe) removes
/// exactly that hook, leaving others for the same state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

pub(crate) type EnterHook = Rc<RefCell<dyn FnMut(&str, &[Value])>>;
pub(crate) type LeaveHook = Rc<RefCell<dyn FnMut(&str)>>;

struct Slot<H> {
    id: CallbackId,
    hook: H,
}

pub(crate) struct InstanceStore {
    current: String,
    snapshot: Properties,
    enter: HashMap<String, Vec<Slot<EnterHook>>>,
    leave: HashMap<String, Vec<Slot<LeaveHook>>>,
    next_id: u64,
}

impl InstanceStore {
    /// `snapshot` is the deep-copied initial property values, captured once
    /// here and never mutated again.
    pub(crate) fn new(snapshot: Properties) -> Self {
        Self {
            current: INITIAL_STATE.to_owned(),
            snapshot,
            enter: HashMap::new(),
            leave: HashMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn current(&self) -> &str {
        &self.current
    }

    pub(crate) fn set_current(&mut self, state: &str) {
        self.current = state.to_owned();
    }

    pub(crate) fn is_initial(&self) -> bool {
        self.current == INITIAL_STATE
    }

    pub(crate) fn snapshot(&self) -> &Properties {
        &self.snapshot
    }

    fn next_id(&mut self) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn register_enter(&mut self, state: &str, hook: EnterHook) -> CallbackId {
        let id = self.next_id();
        self.enter
            .entry(state.to_owned())
            .or_default()
            .push(Slot { id, hook });
        id
    }

    pub(crate) fn register_leave(&mut self, state: &str, hook: LeaveHook) -> CallbackId {
        let id = self.next_id();
        self.leave
            .entry(state.to_owned())
            .or_default()
            .push(Slot { id, hook });
        id
    }

    /// Remove the hook registered under `id`, whichever phase it belongs to.
    /// Survivors keep their relative order. Returns whether anything was
    /// removed.
    pub(crate) fn remove(&mut self, id: CallbackId) -> bool {
        for slots in self.enter.values_mut() {
            if let Some(pos) = slots.iter().position(|s| s.id == id) {
                slots.remove(pos);
                return true;
            }
        }
        for slots in self.leave.values_mut() {
            if let Some(pos) = slots.iter().position(|s| s.id == id) {
                slots.remove(pos);
                return true;
            }
        }
        false
    }

    /// Enter hooks for `state`, in registration order. Cloned out so the
    /// engine can invoke them without holding a store borrow.
    pub(crate) fn enter_hooks(&self, state: &str) -> Vec<EnterHook> {
        self.enter
            .get(state)
            .map(|slots| slots.iter().map(|s| Rc::clone(&s.hook)).collect())
            .unwrap_or_default()
    }

    /// Leave hooks for `state`, in registration order.
    pub(crate) fn leave_hooks(&self, state: &str) -> Vec<LeaveHook> {
        self.leave
            .get(state)
            .map(|slots| slots.iter().map(|s| Rc::clone(&s.hook)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enter_hook() -> EnterHook {
        Rc::new(RefCell::new(|_: &str, _: &[Value]| {}))
    }

    fn leave_hook() -> LeaveHook {
        Rc::new(RefCell::new(|_: &str| {}))
    }

    #[test]
    fn starts_in_the_initial_state() {
        let store = InstanceStore::new(Properties::new());
        assert!(store.is_initial());
        assert_eq!(store.current(), INITIAL_STATE);
    }

    #[test]
    fn advancing_leaves_initial() {
        let mut store = InstanceStore::new(Properties::new());
        store.set_current("Green");
        assert!(!store.is_initial());
        assert_eq!(store.current(), "Green");
    }

    #[test]
    fn hooks_keep_registration_order() {
        let mut store = InstanceStore::new(Properties::new());
        let first = store.register_enter("Green", enter_hook());
        let second = store.register_enter("Green", enter_hook());
        assert_ne!(first, second);
        assert_eq!(store.enter_hooks("Green").len(), 2);
        assert!(store.enter_hooks("Red").is_empty());
    }

    #[test]
    fn remove_targets_exactly_one_hook() {
        let mut store = InstanceStore::new(Properties::new());
        let survivor_hook = enter_hook();
        let removed = store.register_enter("Green", enter_hook());
        let survivor = store.register_enter("Green", Rc::clone(&survivor_hook));

        assert!(store.remove(removed));
        let remaining = store.enter_hooks("Green");
        assert_eq!(remaining.len(), 1);
        assert!(Rc::ptr_eq(&remaining[0], &survivor_hook));

        // Handles are single-use once removed.
        assert!(!store.remove(removed));
        assert!(store.remove(survivor));
    }

    #[test]
    fn remove_searches_both_phases() {
        let mut store = InstanceStore::new(Properties::new());
        let id = store.register_leave("Green", leave_hook());
        assert!(store.remove(id));
        assert!(store.leave_hooks("Green").is_empty());
    }
}
