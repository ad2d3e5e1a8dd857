//! Structural comparison of JSON values.
//!
//! Equality is defined on the value tree, never on serialized text, so
//! whitespace, escaping and number formatting cannot cause a mismatch.

use std::collections::BTreeSet;
use std::fmt;

use serde_json::{Number, Value};

/// Structural equality.
///
/// Same type at every position, equal primitives, equal array lengths with
/// per-index equality, equal key sets with pairwise-equal values. Key order
/// is irrelevant. Numbers compare by value, so `1` equals `1.0`.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, x)| match b.get(key) {
                    Some(y) => structurally_equal(x, y),
                    None => false,
                })
        }
        _ => false,
    }
}

/// Numeric equality across integer and float representations.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.is_f64(), b.is_f64()) {
        (true, true) => a.as_f64() == b.as_f64(),
        (false, true) => b.as_f64().map_or(false, |y| integer_equals_float(a, y)),
        (true, false) => a.as_f64().map_or(false, |x| integer_equals_float(b, x)),
        // A negative i64 against a u64 above i64::MAX.
        (false, false) => false,
    }
}

/// Exact comparison: the float must be integral and inside the integer's
/// range, then the integers are compared without rounding.
fn integer_equals_float(int: &Number, float: f64) -> bool {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

    if !float.is_finite() || float.fract() != 0.0 {
        return false;
    }
    if let Some(i) = int.as_i64() {
        (-TWO_POW_63..TWO_POW_63).contains(&float) && float as i64 == i
    } else if let Some(u) = int.as_u64() {
        (0.0..TWO_POW_64).contains(&float) && float as u64 == u
    } else {
        false
    }
}

/// Which side of a comparison lacks a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Kind of the first structural difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DivergenceKind {
    /// Different JSON types at the same position.
    TypeMismatch,
    /// Same primitive type, different value.
    ValueMismatch,
    /// Arrays of different length (all common elements equal).
    LengthMismatch { left: usize, right: usize },
    /// Object key present on one side only.
    MissingKey { missing_from: Side },
}

/// First structural difference between two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Divergence {
    /// JSON Pointer (RFC 6901) to the differing position.
    pub pointer: String,
    pub kind: DivergenceKind,
}

impl Divergence {
    fn at(pointer: &str, kind: DivergenceKind) -> Self {
        Self {
            pointer: pointer.to_owned(),
            kind,
        }
    }
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = if self.pointer.is_empty() { "/" } else { &self.pointer };
        match &self.kind {
            DivergenceKind::TypeMismatch => write!(f, "type mismatch at {at}"),
            DivergenceKind::ValueMismatch => write!(f, "value mismatch at {at}"),
            DivergenceKind::LengthMismatch { left, right } => {
                write!(f, "array length {left} vs {right} at {at}")
            }
            DivergenceKind::MissingKey { missing_from: Side::Left } => {
                write!(f, "missing on live side at {at}")
            }
            DivergenceKind::MissingKey { missing_from: Side::Right } => {
                write!(f, "missing on repository side at {at}")
            }
        }
    }
}

/// Locate the first difference, depth first, object keys in sorted order.
///
/// Returns `None` exactly when [`structurally_equal`] returns true.
pub fn first_divergence(a: &Value, b: &Value) -> Option<Divergence> {
    let mut pointer = String::new();
    find_divergence(a, b, &mut pointer)
}

fn find_divergence(a: &Value, b: &Value, pointer: &mut String) -> Option<Divergence> {
    match (a, b) {
        (Value::Array(xs), Value::Array(ys)) => {
            for (index, (x, y)) in xs.iter().zip(ys).enumerate() {
                let mark = pointer.len();
                pointer.push('/');
                pointer.push_str(&index.to_string());
                let found = find_divergence(x, y, pointer);
                pointer.truncate(mark);
                if found.is_some() {
                    return found;
                }
            }
            if xs.len() != ys.len() {
                return Some(Divergence::at(
                    pointer,
                    DivergenceKind::LengthMismatch {
                        left: xs.len(),
                        right: ys.len(),
                    },
                ));
            }
            None
        }
        (Value::Object(xs), Value::Object(ys)) => {
            let keys: BTreeSet<&str> = xs.keys().chain(ys.keys()).map(String::as_str).collect();
            for key in keys {
                let mark = pointer.len();
                pointer.push('/');
                push_escaped(pointer, key);
                let found = match (xs.get(key), ys.get(key)) {
                    (Some(x), Some(y)) => find_divergence(x, y, pointer),
                    (Some(_), None) => Some(Divergence::at(
                        pointer,
                        DivergenceKind::MissingKey {
                            missing_from: Side::Right,
                        },
                    )),
                    (None, _) => Some(Divergence::at(
                        pointer,
                        DivergenceKind::MissingKey {
                            missing_from: Side::Left,
                        },
                    )),
                };
                pointer.truncate(mark);
                if found.is_some() {
                    return found;
                }
            }
            None
        }
        _ if std::mem::discriminant(a) != std::mem::discriminant(b) => {
            Some(Divergence::at(pointer, DivergenceKind::TypeMismatch))
        }
        _ if structurally_equal(a, b) => None,
        _ => Some(Divergence::at(pointer, DivergenceKind::ValueMismatch)),
    }
}

fn push_escaped(pointer: &mut String, key: &str) {
    for ch in key.chars() {
        match ch {
            '~' => pointer.push_str("~0"),
            '/' => pointer.push_str("~1"),
            c => pointer.push(c),
        }
    }
}
