//! Property bags and the field-level deep merge applied during transitions.

use serde_json::{Map, Value};

/// A property bag: a JSON object of named values, possibly nested.
///
/// The machine's live properties, the frozen initial snapshot, and every
/// state overlay are all `Properties`. Deep copy is `Clone` — cyclic
/// property graphs are unrepresentable in `serde_json::Value`.
pub type Properties = Map<String, Value>;

/// Merge `overlay` onto `base`, field by field.
///
/// Keys present in `overlay` win. When both sides hold an object at the same
/// key the merge recurses, so sibling keys from `base` survive; any other
/// pairing (including an explicit `null` in `overlay`) replaces the value at
/// that key path entirely.
///
/// # Example
///
/// ```rust
/// use stance::core::merge_into;
/// use serde_json::json;
///
/// let mut base = json!({"display": {"message": "OFF", "color": "grey"}, "safe": false})
///     .as_object()
///     .cloned()
///     .unwrap();
/// let overlay = json!({"display": {"message": "GO"}, "safe": true})
///     .as_object()
///     .cloned()
///     .unwrap();
///
/// merge_into(&mut base, &overlay);
///
/// assert_eq!(base["display"]["message"], "GO");
/// assert_eq!(base["display"]["color"], "grey"); // sibling survives
/// assert_eq!(base["safe"], true);
/// ```
pub fn merge_into(base: &mut Properties, overlay: &Properties) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_into(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}
