//! Document Approval Workflow
//!
//! This example demonstrates a multi-stage workflow with overlay
//! inheritance and lifecycle hooks.
//!
//! Key concepts:
//! - Multi-stage workflow (Draft -> Review -> Published)
//! - A child state (Published) inheriting its parent's overlay
//! - Nested property objects merged field by field
//! - Identity-based hook deregistration
//!
//! Run with: cargo run --example document_workflow

use serde_json::json;
use stance::{declare_states, StateMachineBuilder};

fn main() {
    println!("=== Document Approval Workflow ===\n");

    let def = declare_states! {
        state Draft {
            parent: initial,
            next: [Review],
            props: { "editable": true, "banner": { "text": "Work in progress" } },
        }
        state Review {
            parent: initial,
            next: [Draft, Published],
            props: { "editable": false, "banner": { "text": "Under review" } },
        }
        state Published {
            parent: Review,
            next: [],
            props: { "public": true, "banner": { "badge": "live" } },
        }
    };

    let machine = StateMachineBuilder::new()
        .definition(def)
        .initial_transition("Draft")
        .props(json!({
            "editable": false,
            "public": false,
            "banner": { "text": "New document", "color": "grey" }
        }))
        .build()
        .expect("workflow configuration is valid");

    let audit = machine.on_enter("Review", |prev, args| {
        println!("  (audit) review requested from {prev}, args: {args:?}");
    });

    println!("Starting in: {}", machine.current_state());

    machine.transit_to("Draft", &[]).unwrap();
    println!("\nDraft:     {}", json!(machine.props().clone()));

    machine
        .transit_to("Review", &[json!({"reviewer": "maya"})])
        .unwrap();
    println!("Review:    {}", json!(machine.props().clone()));

    // Published inherits Review's overlay; its own fields win, and the
    // banner's untouched color survives from the snapshot.
    machine.transit_to("Published", &[]).unwrap();
    println!("Published: {}", json!(machine.props().clone()));

    machine.unsubscribe(audit);

    println!("\nTerminal: no transitions permitted -> {:?}", machine.transitions());
    println!("Path: {:?}", machine.log().path());

    println!("\n=== Example Complete ===");
}
