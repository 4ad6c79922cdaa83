//! Structural fingerprinting of values.
//!
//! A cell persists the fingerprint of the last-seen initial value so later
//! activations can tell "the caller passed a semantically different initial
//! value" apart from "the caller rebuilt an equal value". That requires a
//! structural hash: two values that are deeply equal must fingerprint
//! identically no matter how they were allocated or in what order map
//! entries were inserted.
//!
//! The fingerprint is SHA-256 over a tagged feed of the value tree: one
//! discriminant byte per node, then the payload, with object entries sorted
//! by key. Float zero is normalized so `0.0` and `-0.0` (equal under
//! IEEE-754 comparison) fingerprint identically.
//!
//! The absent value has no fingerprint at all; [`fingerprint`] returns
//! `None` exactly when its input is `None`.

use crate::value::Value;
use sha2::{Digest, Sha256};
use std::fmt;

// Node tags for the hash feed. Stable: changing one invalidates every
// persisted fingerprint.
const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_STRING: u8 = 4;
const TAG_BYTES: u8 = 5;
const TAG_ARRAY: u8 = 6;
const TAG_OBJECT: u8 = 7;

/// A deterministic structural hash of a value, as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap a digest previously read back from storage.
    ///
    /// No validation is performed; the fingerprint slot is trusted to hold
    /// whatever [`fingerprint`] once produced. A corrupted entry simply
    /// compares unequal to every real digest, which degrades to "initial
    /// value changed".
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Fingerprint(raw.into())
    }

    /// The digest text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint a possibly-absent value.
///
/// Pure and deterministic. Returns `None` if and only if the value is
/// absent.
pub fn fingerprint(value: Option<&Value>) -> Option<Fingerprint> {
    let value = value?;
    let mut hasher = Sha256::new();
    feed(&mut hasher, value);
    let digest = hasher.finalize();

    use fmt::Write as _;
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Writing to a String cannot fail
        let _ = write!(hex, "{:02x}", byte);
    }
    Some(Fingerprint(hex))
}

fn feed(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update([TAG_NULL]),
        Value::Bool(b) => {
            hasher.update([TAG_BOOL, u8::from(*b)]);
        }
        Value::Int(i) => {
            hasher.update([TAG_INT]);
            hasher.update(i.to_be_bytes());
        }
        Value::Float(f) => {
            hasher.update([TAG_FLOAT]);
            // 0.0 == -0.0, so both must hash alike
            let bits = if *f == 0.0 { 0u64 } else { f.to_bits() };
            hasher.update(bits.to_be_bytes());
        }
        Value::String(s) => {
            hasher.update([TAG_STRING]);
            hasher.update((s.len() as u64).to_be_bytes());
            hasher.update(s.as_bytes());
        }
        Value::Bytes(b) => {
            hasher.update([TAG_BYTES]);
            hasher.update((b.len() as u64).to_be_bytes());
            hasher.update(b);
        }
        Value::Array(items) => {
            hasher.update([TAG_ARRAY]);
            hasher.update((items.len() as u64).to_be_bytes());
            for item in items {
                feed(hasher, item);
            }
        }
        Value::Object(entries) => {
            // Sorted for determinism across map iteration orders
            let mut sorted: Vec<_> = entries.iter().collect();
            sorted.sort_by_key(|(k, _)| k.as_str());

            hasher.update([TAG_OBJECT]);
            hasher.update((sorted.len() as u64).to_be_bytes());
            for (key, item) in sorted {
                hasher.update((key.len() as u64).to_be_bytes());
                hasher.update(key.as_bytes());
                feed(hasher, item);
            }
        }
    }
}
