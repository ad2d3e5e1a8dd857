//! Golden canonicalization vectors.

use dashsync_core::{canonicalize, Digest};
use dashsync_testkit::vectors::{all_vectors, Policy};
use serde_json::Value;

fn parse(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn golden_vectors_canonicalize_to_expected_bytes() {
    for vector in all_vectors() {
        let canonical = canonicalize(&parse(vector.input), &vector.policy.volatile_keys());
        assert_eq!(
            String::from_utf8(canonical.to_canonical_bytes()).unwrap(),
            vector.expected,
            "vector {:?}",
            vector.name
        );
        assert_eq!(
            canonical.digest(),
            Digest::of(vector.expected.as_bytes()),
            "vector {:?}",
            vector.name
        );
    }
}

#[test]
fn golden_outputs_are_fixed_points() {
    for vector in all_vectors() {
        let canonical = canonicalize(&parse(vector.expected), &vector.policy.volatile_keys());
        assert_eq!(
            canonical.to_canonical_bytes(),
            vector.expected.as_bytes(),
            "vector {:?}",
            vector.name
        );
    }
}

#[test]
fn golden_inputs_are_not_already_canonical() {
    // Every vector except the pass-through ones exercises a real change.
    let changed = all_vectors()
        .into_iter()
        .filter(|v| v.input != v.expected)
        .count();
    assert!(changed >= 6);
}

#[test]
fn live_and_repository_policies_differ_only_on_volatile_keys() {
    for vector in all_vectors() {
        let input = parse(vector.input);
        let live = canonicalize(&input, &Policy::Live.volatile_keys());
        let repo = canonicalize(&input, &Policy::Repository.volatile_keys());
        let has_volatile = vector.input.contains("linkedEntityGuids");
        assert_eq!(live.matches(&repo), !has_volatile, "vector {:?}", vector.name);
    }
}
