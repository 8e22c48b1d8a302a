//! Stance: a declarative state machine library
//!
//! Stance machines are declared, not wired: each state names its parent,
//! the states it may transition to, and a partial property overlay. At
//! transition time the engine validates the request, resolves the overlay
//! chain from the target back through its ancestors, reapplies it onto the
//! machine's initial property snapshot, and fires enter/leave lifecycle
//! hooks in order — guarding against re-entrant transitions throughout.
//!
//! # Core Concepts
//!
//! - **Declaration**: per-state metadata (parent, permitted next states,
//!   overlay) collected in a [`MachineDefinition`] shared by every instance
//!   of a machine type
//! - **Overlay inheritance**: a state's effective properties are the
//!   initial snapshot plus each ancestor overlay, most specific last
//! - **Lifecycle hooks**: ordered enter/leave callbacks with identity-based
//!   deregistration
//!
//! # Example
//!
//! ```rust
//! use stance::{StateMachineBuilder, declare_states};
//! use serde_json::json;
//!
//! let def = declare_states! {
//!     state Red {
//!         parent: initial,
//!         next: [Green],
//!         props: { "message": "STOP" },
//!     }
//!     state Orange {
//!         parent: initial,
//!         next: [Green, Red],
//!         props: { "message": "CAUTION" },
//!     }
//!     state Green {
//!         parent: initial,
//!         next: [Orange],
//!         props: { "message": "GO", "safe": true },
//!     }
//! };
//!
//! let machine = StateMachineBuilder::new()
//!     .definition(def)
//!     .initial_transition("Green")
//!     .props(json!({"message": "OFF", "safe": false}))
//!     .build()
//!     .unwrap();
//!
//! machine.transit_to("Green", &[]).unwrap();
//! assert_eq!(machine.prop("message"), Some(json!("GO")));
//!
//! machine.transit_to("Orange", &[]).unwrap();
//! // Orange's overlay does not set `safe`; it reverts to the snapshot.
//! assert_eq!(machine.prop("safe"), Some(json!(false)));
//!
//! machine.transit_to("Red", &[]).unwrap();
//! assert!(machine.is("Red"));
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use core::{
    MachineDefinition, Properties, StateDeclaration, TransitionLog, TransitionRecord,
    INITIAL_STATE,
};
pub use machine::{CallbackId, StateMachine, TransitionError};
