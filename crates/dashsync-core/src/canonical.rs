//! Canonical form for dashboard documents.
//!
//! The live dashboard and its repository copy rarely serialize identically:
//! the two APIs disagree on key order, and the stored file may carry fields
//! the live API never returns. Canonicalization removes both kinds of noise:
//! - Object keys sorted by code point, at every depth
//! - Volatile keys dropped, at every depth
//! - Array order untouched (element order is meaningful in a dashboard)
//!
//! Both rules are applied in a single pass by [`transform`], driven by a
//! [`KeyPolicy`]. The input value is never modified.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::compare::structurally_equal;
use crate::types::Digest;

/// Field present in exported dashboard files but not in the live entity.
pub const LINKED_ENTITY_GUIDS: &str = "linkedEntityGuids";

/// Decides which object keys survive a [`transform`] and in what order.
pub trait KeyPolicy {
    /// Whether an entry with this key is kept.
    fn keep(&self, key: &str) -> bool;

    /// Ordering of the surviving keys.
    fn order(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Rebuild a value tree, filtering and ordering object keys by `policy`.
///
/// Arrays are transformed element-wise with their order preserved;
/// primitives are cloned as-is.
pub fn transform<P: KeyPolicy + ?Sized>(value: &Value, policy: &P) -> Value {
    match value {
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| transform(item, policy)).collect())
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> =
                map.iter().filter(|(key, _)| policy.keep(key)).collect();
            entries.sort_by(|(a, _), (b, _)| policy.order(a, b));

            let mut out = Map::with_capacity(entries.len());
            for (key, child) in entries {
                out.insert(key.clone(), transform(child, policy));
            }
            Value::Object(out)
        }
        primitive => primitive.clone(),
    }
}

/// Set of keys stripped during canonicalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolatileKeys(BTreeSet<String>);

impl VolatileKeys {
    /// No volatile keys. Used for the live (monitoring) document.
    pub fn none() -> Self {
        Self::default()
    }

    /// Keys scrubbed from the repository copy before comparison.
    pub fn repository() -> Self {
        [LINKED_ENTITY_GUIDS].into_iter().collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for VolatileKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Policy used by [`canonicalize`]: drop volatile keys, sort by code point.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalPolicy<'a> {
    volatile: &'a VolatileKeys,
}

impl<'a> CanonicalPolicy<'a> {
    pub fn new(volatile: &'a VolatileKeys) -> Self {
        Self { volatile }
    }
}

impl KeyPolicy for CanonicalPolicy<'_> {
    fn keep(&self, key: &str) -> bool {
        !self.volatile.contains(key)
    }
}

/// A JSON value in canonical form.
///
/// Only obtainable through [`canonicalize`], so holding one proves both
/// normalization rules were applied.
#[derive(Clone)]
pub struct CanonicalDocument(Value);

impl CanonicalDocument {
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Structural equality against another canonical document.
    pub fn matches(&self, other: &CanonicalDocument) -> bool {
        structurally_equal(&self.0, &other.0)
    }

    /// Compact serialization. Deterministic because keys are already sorted.
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }

    /// Pretty-printed serialization with a trailing newline, as committed to
    /// the repository.
    pub fn to_pretty_string(&self) -> String {
        format!("{:#}\n", self.0)
    }

    /// Blake3 digest of the compact serialization.
    ///
    /// Equal digests imply a match. The converse does not hold: `1` and
    /// `1.0` match but serialize differently.
    pub fn digest(&self) -> Digest {
        Digest::of(&self.to_canonical_bytes())
    }

    /// Top-level `name` field, if the document has one.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

impl PartialEq for CanonicalDocument {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl fmt::Debug for CanonicalDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CanonicalDocument").field(&self.0).finish()
    }
}

impl fmt::Display for CanonicalDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Canonicalize a value: drop `volatile` keys and sort all object keys.
pub fn canonicalize(value: &Value, volatile: &VolatileKeys) -> CanonicalDocument {
    CanonicalDocument(transform(value, &CanonicalPolicy::new(volatile)))
}
