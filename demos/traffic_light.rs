//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic machine with per-state property
//! overlays.
//!
//! Key concepts:
//! - Declarative state definitions via `declare_states!`
//! - Property overlays merged onto the initial snapshot
//! - Fields reverting when a state's overlay does not set them
//! - Gated diagnostic logging of rejected transitions
//!
//! Run with: cargo run --example traffic_light

use serde_json::json;
use stance::{declare_states, StateMachineBuilder};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stance=debug")),
        )
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let def = declare_states! {
        state Red {
            parent: initial,
            next: [Green],
            props: { "message": "STOP" },
        }
        state Orange {
            parent: initial,
            next: [Green, Red],
            props: { "message": "CAUTION" },
        }
        state Green {
            parent: initial,
            next: [Orange],
            props: { "message": "GO", "safe": true },
        }
    };

    let machine = StateMachineBuilder::new()
        .definition(def)
        .initial_transition("Green")
        .props(json!({"message": "OFF", "safe": false}))
        .logging(true)
        .build()
        .expect("traffic light configuration is valid");

    println!("Initial state: {}", machine.current_state());
    println!("Initial props: {:?}\n", machine.props());

    machine.on_enter("Green", |prev, _| {
        println!("  (hook) entered Green from {prev}");
    });
    machine.on_leave("Green", |target| {
        println!("  (hook) leaving Green for {target}");
    });

    for target in ["Green", "Orange", "Red"] {
        match machine.transit_to(target, &[]) {
            Ok(()) => println!(
                "-> {target}: message={}, safe={}",
                machine.prop("message").unwrap(),
                machine.prop("safe").unwrap()
            ),
            Err(err) => println!("-> {target}: rejected ({err})"),
        }
    }

    println!("\nPermitted from {}: {:?}", machine.current_state(), machine.transitions());
    println!("Path so far: {:?}", machine.log().path());

    println!("\n=== Example Complete ===");
}
