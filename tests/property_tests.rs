//! Property-based tests for overlay merging and the transition engine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated property bags and transition sequences.

use proptest::prelude::*;
use serde_json::{json, Value};
use stance::core::merge_into;
use stance::{MachineDefinition, Properties, StateDeclaration, StateMachineBuilder};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn flat_props() -> impl Strategy<Value = Properties> {
    prop::collection::btree_map("[a-e]", scalar(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

fn nested_props() -> impl Strategy<Value = Properties> {
    prop::collection::btree_map(
        "[a-e]",
        prop_oneof![scalar(), flat_props().prop_map(Value::Object)],
        0..5,
    )
    .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn overlay_keys_always_win(base in flat_props(), overlay in flat_props()) {
        let mut merged = base.clone();
        merge_into(&mut merged, &overlay);
        for (key, value) in &overlay {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    #[test]
    fn untouched_keys_always_survive(base in flat_props(), overlay in flat_props()) {
        let mut merged = base.clone();
        merge_into(&mut merged, &overlay);
        for (key, value) in &base {
            if !overlay.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    #[test]
    fn merge_is_idempotent(base in nested_props(), overlay in nested_props()) {
        let mut once = base.clone();
        merge_into(&mut once, &overlay);
        let mut twice = once.clone();
        merge_into(&mut twice, &overlay);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn nested_siblings_survive(inner_overlay in flat_props()) {
        let mut base = Properties::new();
        base.insert("z".to_owned(), json!({"keep": "kept"}));

        let mut overlay = Properties::new();
        overlay.insert("z".to_owned(), Value::Object(inner_overlay));
        merge_into(&mut base, &overlay);

        prop_assert_eq!(&base["z"]["keep"], &json!("kept"));
    }

    #[test]
    fn effective_props_follow_the_overlay_chain(
        snapshot in flat_props(),
        parent_overlay in nested_props(),
        child_overlay in nested_props(),
    ) {
        let mut def = MachineDefinition::new();
        def.declare(
            "Parent",
            StateDeclaration::new("initial", ["Child"])
                .overlay(Value::Object(parent_overlay.clone())),
        );
        def.declare(
            "Child",
            StateDeclaration::new("Parent", Vec::<String>::new())
                .overlay(Value::Object(child_overlay.clone())),
        );

        let machine = StateMachineBuilder::new()
            .definition(def)
            .initial_transition("Child")
            .props(Value::Object(snapshot.clone()))
            .build()
            .unwrap();
        machine.transit_to("Child", &[]).unwrap();

        let mut expected = snapshot;
        merge_into(&mut expected, &parent_overlay);
        merge_into(&mut expected, &child_overlay);
        prop_assert_eq!(machine.props().clone(), expected);
    }

    #[test]
    fn failed_transitions_never_mutate(
        target in "[A-Z][a-z]{0,5}",
        snapshot in flat_props(),
    ) {
        prop_assume!(target != "Known");

        let mut def = MachineDefinition::new();
        def.declare(
            "Known",
            StateDeclaration::new("initial", Vec::<String>::new()).overlay(json!({"here": true})),
        );
        let machine = StateMachineBuilder::new()
            .definition(def)
            .initial_transition("Known")
            .props(Value::Object(snapshot.clone()))
            .build()
            .unwrap();

        prop_assert!(machine.transit_to(&target, &[]).is_err());
        prop_assert!(machine.is_initial_state());
        prop_assert_eq!(machine.props().clone(), snapshot);
        prop_assert!(machine.log().is_empty());
    }

    #[test]
    fn valid_sequences_land_on_the_requested_target(
        picks in prop::collection::vec(0usize..2, 1..10),
    ) {
        let states = ["Red", "Orange", "Green"];
        let mut def = MachineDefinition::new();
        for (i, name) in states.iter().enumerate() {
            let others: Vec<&str> = states
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, s)| *s)
                .collect();
            def.declare(
                *name,
                StateDeclaration::new("initial", others).overlay(json!({"name": *name})),
            );
        }
        let machine = StateMachineBuilder::new()
            .definition(def)
            .initial_transitions(states)
            .build()
            .unwrap();

        for pick in picks {
            let options = machine.transitions();
            let target = options[pick % options.len()].clone();
            machine.transit_to(&target, &[]).unwrap();
            prop_assert_eq!(machine.current_state(), target.clone());
            prop_assert_eq!(machine.prop("name"), Some(json!(target)));
        }
    }
}
