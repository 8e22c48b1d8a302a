//! Macros for declarative machine definitions.

/// Build a [`MachineDefinition`](crate::MachineDefinition) from a
/// declarative block.
///
/// Each `state` entry names its parent (`initial` for hierarchy roots), its
/// permitted next states, and the property overlay merged in when the state
/// becomes active. Use `props: {}` for a state with nothing to overlay.
///
/// # Example
///
/// ```rust
/// use stance::declare_states;
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
/// assert_eq!(def.get("Red").unwrap().next, vec!["Green"]);
/// assert_eq!(def.get("Green").unwrap().overlay["safe"], true);
/// ```
#[macro_export]
macro_rules! declare_states {
    (
        $(
            state $name:ident {
                parent: $parent:ident,
                next: [$($next:ident),* $(,)?],
                props: $overlay:tt $(,)?
            }
        )*
    ) => {{
        let mut def = $crate::core::MachineDefinition::new();
        $(
            let next: ::std::vec::Vec<&str> = ::std::vec![$(stringify!($next)),*];
            def.declare(
                stringify!($name),
                $crate::core::StateDeclaration::new(stringify!($parent), next)
                    .overlay(serde_json::json!($overlay)),
            );
        )*
        def
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::INITIAL_STATE;

    #[test]
    fn declare_states_builds_a_definition() {
        let def = declare_states! {
            state Draft {
                parent: initial,
                next: [Review],
                props: { "editable": true },
            }
            state Review {
                parent: initial,
                next: [Draft, Published],
                props: { "editable": false },
            }
            state Published {
                parent: Review,
                next: [],
                props: { "public": true },
            }
        };

        assert_eq!(def.len(), 3);
        assert_eq!(def.get("Draft").unwrap().parent, INITIAL_STATE);
        assert_eq!(def.get("Published").unwrap().parent, "Review");
        assert_eq!(def.get("Review").unwrap().next, vec!["Draft", "Published"]);
        assert!(def.get("Published").unwrap().next.is_empty());
    }

    #[test]
    fn empty_props_are_allowed() {
        let def = declare_states! {
            state Idle {
                parent: initial,
                next: [Idle],
                props: {},
            }
        };
        assert!(def.get("Idle").unwrap().overlay.is_empty());
    }

    #[test]
    fn empty_block_builds_an_empty_definition() {
        let def = declare_states! {};
        assert!(def.is_empty());
    }
}
