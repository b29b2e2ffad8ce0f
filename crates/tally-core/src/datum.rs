//! Row values and row keys.
//!
//! A [`Datum`] is whatever the host handed us for one observation: usually a
//! number, sometimes a category string or a whole record. A [`Key`] is the
//! identifier the shared filter bus uses to talk about a row.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single JSON-like observation value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Datum {
    /// Missing value (`null` / `NA`)
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    Text(String),
    /// Nested list
    List(Vec<Datum>),
    /// Record with named fields
    Record(BTreeMap<String, Datum>),
}

impl Datum {
    /// Create a numeric datum.
    #[must_use]
    pub const fn number(v: f64) -> Self {
        Self::Number(v)
    }

    /// Create a string datum.
    #[must_use]
    pub fn text(v: impl Into<String>) -> Self {
        Self::Text(v.into())
    }

    /// Check if null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get as number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get a record field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Set-membership view of a [`Datum`].
///
/// Equality is SameValueZero: `NaN` equals `NaN` and `-0.0` equals `0.0`.
/// Everything else compares structurally.
#[derive(Debug, Clone, Copy)]
pub struct DistinctKey<'a>(pub &'a Datum);

fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0.0_f64.to_bits()
    } else {
        n.to_bits()
    }
}

fn same_value_zero(a: &Datum, b: &Datum) -> bool {
    match (a, b) {
        (Datum::Null, Datum::Null) => true,
        (Datum::Bool(x), Datum::Bool(y)) => x == y,
        (Datum::Number(x), Datum::Number(y)) => canonical_bits(*x) == canonical_bits(*y),
        (Datum::Text(x), Datum::Text(y)) => x == y,
        (Datum::List(x), Datum::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| same_value_zero(a, b))
        }
        (Datum::Record(x), Datum::Record(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && same_value_zero(va, vb))
        }
        _ => false,
    }
}

fn hash_datum<H: Hasher>(datum: &Datum, state: &mut H) {
    std::mem::discriminant(datum).hash(state);
    match datum {
        Datum::Null => {}
        Datum::Bool(b) => b.hash(state),
        Datum::Number(n) => canonical_bits(*n).hash(state),
        Datum::Text(s) => s.hash(state),
        Datum::List(items) => {
            items.len().hash(state);
            for item in items {
                hash_datum(item, state);
            }
        }
        Datum::Record(fields) => {
            fields.len().hash(state);
            for (k, v) in fields {
                k.hash(state);
                hash_datum(v, state);
            }
        }
    }
}

impl PartialEq for DistinctKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        same_value_zero(self.0, other.0)
    }
}

impl Eq for DistinctKey<'_> {}

impl Hash for DistinctKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_datum(self.0, state);
    }
}

/// Row identifier shared with the filter bus.
///
/// Keys are strings on the wire. Numeric keys are normalized to their
/// decimal form so `3`, `3.0` and `"3"` name the same row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    /// Create a key from a string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for the row at `position` when no explicit keys are given.
    #[must_use]
    pub fn positional(position: usize) -> Self {
        Self(position.to_string())
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<usize> for Key {
    fn from(n: usize) -> Self {
        Self::positional(n)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKey {
    Text(String),
    Int(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawKey::deserialize(deserializer)? {
            RawKey::Text(s) => Self(s),
            RawKey::Int(n) => Self(n.to_string()),
            RawKey::Float(f) => Self(f.to_string()),
        })
    }
}
