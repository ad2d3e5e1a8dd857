//! Golden canonicalization vectors.
//!
//! Each vector pins the compact canonical serialization of an input under a
//! volatile-key policy. Any change to key ordering or key removal shows up
//! here first.

use dashsync_core::VolatileKeys;

/// Which volatile-key set a vector is canonicalized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Live side: nothing removed.
    Live,
    /// Repository side: `linkedEntityGuids` removed.
    Repository,
}

impl Policy {
    pub fn volatile_keys(self) -> VolatileKeys {
        match self {
            Policy::Live => VolatileKeys::none(),
            Policy::Repository => VolatileKeys::repository(),
        }
    }
}

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub policy: Policy,
    /// Input JSON text.
    pub input: &'static str,
    /// Expected compact canonical JSON text.
    pub expected: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "primitive passes through",
            policy: Policy::Repository,
            input: "42",
            expected: "42",
        },
        GoldenVector {
            name: "nested keys sorted",
            policy: Policy::Live,
            input: r#"{"b":1,"a":{"d":[3,{"z":0,"y":1}],"c":null}}"#,
            expected: r#"{"a":{"c":null,"d":[3,{"y":1,"z":0}]},"b":1}"#,
        },
        GoldenVector {
            name: "code point order",
            policy: Policy::Live,
            input: r#"{"b":0,"a":1,"B":2,"_":3,"é":4,"A":5}"#,
            expected: r#"{"A":5,"B":2,"_":3,"a":1,"b":0,"é":4}"#,
        },
        GoldenVector {
            name: "volatile key removed at every depth",
            policy: Policy::Repository,
            input: r#"{"name":"D","linkedEntityGuids":["x"],"pages":[{"widgets":[{"linkedEntityGuids":null,"title":"W"}]}]}"#,
            expected: r#"{"name":"D","pages":[{"widgets":[{"title":"W"}]}]}"#,
        },
        GoldenVector {
            name: "volatile key kept on live side",
            policy: Policy::Live,
            input: r#"{"name":"D","linkedEntityGuids":["x"],"pages":[{"widgets":[{"linkedEntityGuids":null,"title":"W"}]}]}"#,
            expected: r#"{"linkedEntityGuids":["x"],"name":"D","pages":[{"widgets":[{"linkedEntityGuids":null,"title":"W"}]}]}"#,
        },
        GoldenVector {
            name: "array order preserved",
            policy: Policy::Repository,
            input: r#"[{"b":1,"a":2},3,"x",[2,1]]"#,
            expected: r#"[{"a":2,"b":1},3,"x",[2,1]]"#,
        },
        GoldenVector {
            name: "floats keep their form",
            policy: Policy::Live,
            input: r#"{"w":4.0,"h":1.5}"#,
            expected: r#"{"h":1.5,"w":4.0}"#,
        },
        GoldenVector {
            name: "escaped strings",
            policy: Policy::Live,
            input: r#"{"query":"SELECT count(*) FROM \"Transaction\"\n","alias":"a\\b"}"#,
            expected: r#"{"alias":"a\\b","query":"SELECT count(*) FROM \"Transaction\"\n"}"#,
        },
        GoldenVector {
            name: "empty containers",
            policy: Policy::Repository,
            input: r#"{"b":{},"a":[],"linkedEntityGuids":{}}"#,
            expected: r#"{"a":[],"b":{}}"#,
        },
    ]
}

/// Look up a vector by name.
pub fn vector(name: &str) -> Option<GoldenVector> {
    all_vectors().into_iter().find(|v| v.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_names_unique() {
        let vectors = all_vectors();
        for (i, v) in vectors.iter().enumerate() {
            assert!(
                vectors[i + 1..].iter().all(|w| w.name != v.name),
                "duplicate vector name {}",
                v.name
            );
        }
    }

    #[test]
    fn test_vector_lookup() {
        assert!(vector("array order preserved").is_some());
        assert!(vector("nope").is_none());
    }
}
