//! The canonical value model for persistent cells.
//!
//! A cell holds one [`Value`]: a dynamic tree of the JSON-like types a UI
//! would reasonably persist. The *absent* state ("this cell holds nothing")
//! is deliberately not a variant — it is `Option<Value>::None` at every API
//! boundary, so that `Null` stays a real, storable value distinct from
//! absence.
//!
//! ## Equality rules
//!
//! - Different types are never equal (no coercion): `Int(1) != Float(1.0)`,
//!   `String("abc") != Bytes([97, 98, 99])`.
//! - `Float` follows IEEE-754 comparison: `NaN != NaN`, `-0.0 == 0.0`.
//!
//! Structural equality is what [`PartialEq`] gives you. The separate
//! [`same_identity`](Value::same_identity) check answers a different
//! question — "would the host runtime consider this the same allocation?" —
//! and is what gates redundant persistence.

use std::collections::HashMap;

/// A dynamically typed value held by a persistent cell.
///
/// The only serialized form of a `Value` is the wire codec's text
/// encoding; the type itself carries no serializer coupling.
#[derive(Debug, Clone)]
pub enum Value {
    /// An explicit null. Present, storable, and distinct from absence.
    Null,

    /// Boolean true or false.
    Bool(bool),

    /// 64-bit signed integer.
    Int(i64),

    /// 64-bit IEEE-754 float. NaN, ±Inf and -0.0 are all representable and
    /// survive the wire codec.
    Float(f64),

    /// UTF-8 string.
    String(String),

    /// Arbitrary binary data. Not interchangeable with `String`.
    Bytes(Vec<u8>),

    /// Ordered sequence of values.
    Array(Vec<Value>),

    /// String-keyed map of values.
    Object(HashMap<String, Value>),
}

impl Value {
    /// The type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    /// True if this value is the explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value as a bool, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an i64, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as an f64, if it is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a byte slice, if it is binary data.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The value as an array slice, if it is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The value as a map reference, if it is an object.
    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Identity comparison in the host-runtime sense.
    ///
    /// Primitives compare by content (`Float` bitwise, so NaN is identical
    /// to itself and `0.0` is not identical to `-0.0`). Containers and
    /// bytes are never identical: an owned `Array`/`Object`/`Bytes` models
    /// a fresh allocation, the way a rebuilt object is a fresh reference in
    /// the original runtime.
    ///
    /// This is the change gate for persistence. It is intentionally *not*
    /// deep equality: a rebuilt container that happens to be deeply equal
    /// to the current value still counts as a change.
    pub fn same_identity(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Different types never compare equal
            _ => false,
        }
    }
}

// Eq despite Float: the model follows IEEE-754, where NaN != NaN. Callers
// comparing NaN-bearing values must expect that.
impl Eq for Value {}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(entries: HashMap<String, Value>) -> Self {
        Value::Object(entries)
    }
}

// ============================================================================
// Tests
// ============================================================================
