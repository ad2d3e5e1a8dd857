//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{Map, Value};

use dashsync_core::LINKED_ENTITY_GUIDS;

/// Generate an object key. Occasionally the volatile key.
pub fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => "[a-zA-Z_][a-zA-Z0-9_]{0,7}",
        1 => Just(LINKED_ENTITY_GUIDS.to_owned()),
        1 => "[à-ÿ]{1,3}",
    ]
}

/// Generate a JSON leaf.
pub fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9f64).prop_map(Value::from),
        "[ -~]{0,16}".prop_map(Value::String),
    ]
}

/// Generate an arbitrary JSON document up to a few levels deep.
pub fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Generate a JSON object (the shape of every dashboard document).
pub fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(key(), json_value(), 0..8)
        .prop_map(|entries| Value::Object(entries.into_iter().collect()))
}

/// Rebuild `value` with every object's insertion order reversed.
pub fn reverse_keys(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(reverse_keys).collect()),
        Value::Object(map) => {
            let reversed: Map<String, Value> = map
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), reverse_keys(v)))
                .collect();
            Value::Object(reversed)
        }
        other => other.clone(),
    }
}

/// Rebuild `value` with `key: injected` added to every object.
pub fn inject_key(value: &Value, key: &str, injected: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| inject_key(item, key, injected))
                .collect(),
        ),
        Value::Object(map) => {
            let mut out: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), inject_key(v, key, injected)))
                .collect();
            out.insert(key.to_owned(), injected.clone());
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// True if `key` appears in any object at any depth.
pub fn contains_key_anywhere(value: &Value, key: &str) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|item| contains_key_anywhere(item, key)),
        Value::Object(map) => {
            map.contains_key(key) || map.values().any(|v| contains_key_anywhere(v, key))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashsync_core::{canonicalize, first_divergence, structurally_equal, VolatileKeys};

    proptest! {
        #[test]
        fn test_canonicalize_idempotent(value in json_value()) {
            let volatile = VolatileKeys::repository();
            let once = canonicalize(&value, &volatile);
            let twice = canonicalize(once.as_value(), &volatile);
            prop_assert_eq!(once.to_canonical_bytes(), twice.to_canonical_bytes());
        }

        #[test]
        fn test_key_order_insensitive(value in json_value()) {
            let volatile = VolatileKeys::none();
            let a = canonicalize(&value, &volatile);
            let b = canonicalize(&reverse_keys(&value), &volatile);
            prop_assert!(a.matches(&b));
            prop_assert_eq!(a.to_canonical_bytes(), b.to_canonical_bytes());
        }

        #[test]
        fn test_volatile_removed_at_any_depth(value in json_value()) {
            let injected = inject_key(&value, LINKED_ENTITY_GUIDS, &Value::from("x"));
            let canonical = canonicalize(&injected, &VolatileKeys::repository());
            prop_assert!(!contains_key_anywhere(canonical.as_value(), LINKED_ENTITY_GUIDS));
        }

        #[test]
        fn test_asymmetric_scrubbing_matches(value in json_object()) {
            // A clean live document equals its repository copy with the
            // volatile key injected everywhere.
            let live_source = canonicalize(&value, &VolatileKeys::repository()).into_value();
            let stored = inject_key(&live_source, LINKED_ENTITY_GUIDS, &Value::Array(vec![]));

            let live = canonicalize(&live_source, &VolatileKeys::none());
            let stored = canonicalize(&stored, &VolatileKeys::repository());
            prop_assert!(live.matches(&stored));
        }

        #[test]
        fn test_array_order_preserved(items in prop::collection::vec(json_value(), 0..8)) {
            let volatile = VolatileKeys::repository();
            let canonical = canonicalize(&Value::Array(items.clone()), &volatile);
            let out = canonical.as_value().as_array().unwrap();
            prop_assert_eq!(out.len(), items.len());
            for (got, item) in out.iter().zip(&items) {
                let expected = canonicalize(item, &volatile);
                prop_assert_eq!(got, expected.as_value());
            }
        }

        #[test]
        fn test_equality_is_reflexive_and_divergence_free(value in json_value()) {
            prop_assert!(structurally_equal(&value, &value));
            prop_assert!(first_divergence(&value, &value).is_none());
        }

        #[test]
        fn test_divergence_agrees_with_equality(a in json_value(), b in json_value()) {
            let equal = structurally_equal(&a, &b);
            prop_assert_eq!(equal, first_divergence(&a, &b).is_none());
        }
    }
}
