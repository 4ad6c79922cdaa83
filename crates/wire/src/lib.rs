//! Wire encoding for Cellar
//!
//! Cells persist their contents as text, so the codec must be total over
//! the whole [`Value`](cellar_core::Value) model and exactly reversible:
//! `decode(encode(v)) == v` structurally for every value, including the
//! parts plain JSON cannot carry. Non-native values get explicit wrappers:
//!
//! - `{"$bytes": "<base64>"}` for binary data
//! - `{"$f64": "NaN|+Inf|-Inf|-0.0"}` for special floats
//! - `{"$absent": true}` marks a deliberately persisted absent value
//!
//! Object keys are emitted in sorted order, which makes the encoding
//! deterministic — the same value tree always produces the same text.
//!
//! ## Examples
//!
//! ```
//! use cellar_wire::{decode, encode};
//! use cellar_core::Value;
//!
//! let value = Value::Int(123);
//! let text = encode(&value);
//! assert_eq!(text, "123");
//! assert_eq!(decode(&text).unwrap(), value);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;
mod encode;

pub use decode::{decode, DecodeError};
pub use encode::encode;

/// The stored marker for a deliberately persisted absent value.
///
/// Distinct from `null` (a real value) and from a missing entry (never
/// written). This is the canonical text written for the absent state; on
/// the read side, value slots recognize the sentinel structurally with
/// [`is_absent`] after decoding, while fingerprint slots (which hold raw
/// digests, not encoded values) compare against this exact text.
pub const ABSENT_MARKER: &str = r#"{"$absent":true}"#;

/// Whether a decoded value is the absent marker object.
///
/// Only the exact shape `{"$absent": true}` qualifies; `{"$absent": false}`
/// or an object with extra keys is ordinary data.
pub fn is_absent(value: &cellar_core::Value) -> bool {
    match value {
        cellar_core::Value::Object(map) if map.len() == 1 => {
            matches!(map.get("$absent"), Some(cellar_core::Value::Bool(true)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod absent_tests {
    use super::*;
    use cellar_core::Value;
    use std::collections::HashMap;

    #[test]
    fn marker_decodes_to_absent() {
        let decoded = decode(ABSENT_MARKER).unwrap();
        assert!(is_absent(&decoded));
    }

    #[test]
    fn marker_differs_from_null() {
        assert_ne!(ABSENT_MARKER, encode(&Value::Null));
    }

    #[test]
    fn absent_false_is_ordinary_data() {
        let decoded = decode(r#"{"$absent":false}"#).unwrap();
        assert!(!is_absent(&decoded));
    }

    #[test]
    fn extra_keys_defeat_the_marker() {
        let mut map = HashMap::new();
        map.insert("$absent".to_string(), Value::Bool(true));
        map.insert("other".to_string(), Value::Int(1));
        assert!(!is_absent(&Value::Object(map)));
    }
}

#[cfg(test)]
mod roundtrip_tests {
    use super::*;
    use cellar_core::Value;
    use std::collections::HashMap;

    fn assert_roundtrip(value: Value) {
        let text = encode(&value);
        let decoded = decode(&text).expect("decode failed");
        assert_eq!(decoded, value, "round trip through {text}");
    }

    #[test]
    fn primitives_round_trip() {
        assert_roundtrip(Value::Null);
        assert_roundtrip(Value::Bool(true));
        assert_roundtrip(Value::Bool(false));
        for i in [0, 1, -1, 42, -999, i64::MAX, i64::MIN] {
            assert_roundtrip(Value::Int(i));
        }
        for s in ["", "hello", "日本語", "a\n\t\"b", "with spaces"] {
            assert_roundtrip(Value::from(s));
        }
    }

    #[test]
    fn normal_floats_round_trip() {
        for f in [0.0, 1.5, -2.5, 3.141592653589793, 1e10, 1e-10, f64::MAX] {
            assert_roundtrip(Value::Float(f));
        }
    }

    #[test]
    fn special_floats_round_trip() {
        assert_roundtrip(Value::Float(f64::INFINITY));
        assert_roundtrip(Value::Float(f64::NEG_INFINITY));

        let nan = decode(&encode(&Value::Float(f64::NAN))).unwrap();
        assert!(matches!(nan, Value::Float(f) if f.is_nan()));

        let neg_zero = decode(&encode(&Value::Float(-0.0))).unwrap();
        assert!(matches!(neg_zero, Value::Float(f) if f == 0.0 && f.is_sign_negative()));
    }

    #[test]
    fn bytes_round_trip() {
        assert_roundtrip(Value::Bytes(vec![]));
        assert_roundtrip(Value::Bytes(vec![0]));
        assert_roundtrip(Value::Bytes((0..=255).collect()));
    }

    #[test]
    fn containers_round_trip() {
        assert_roundtrip(Value::Array(vec![]));
        assert_roundtrip(Value::Array(vec![
            Value::Int(1),
            Value::from("two"),
            Value::Bool(true),
            Value::Null,
        ]));

        let mut inner = HashMap::new();
        inner.insert(
            "list".to_string(),
            Value::Array(vec![Value::Int(1), Value::Int(2)]),
        );
        let mut outer = HashMap::new();
        outer.insert("inner".to_string(), Value::Object(inner));
        outer.insert("blob".to_string(), Value::Bytes(vec![1, 2, 3]));
        assert_roundtrip(Value::Object(outer));
    }

    #[test]
    fn stored_integer_recovers_its_type() {
        // The codec restores the value, not just its text
        let decoded = decode("123").unwrap();
        assert_eq!(decoded, Value::Int(123));
        assert_ne!(decoded, Value::from("123"));
    }

    #[test]
    fn bytes_do_not_masquerade_as_arrays() {
        let bytes = encode(&Value::Bytes(vec![1, 2, 3]));
        let array = encode(&Value::Array(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
        ]));
        assert_ne!(bytes, array);
        assert!(matches!(decode(&bytes).unwrap(), Value::Bytes(_)));
        assert!(matches!(decode(&array).unwrap(), Value::Array(_)));
    }
}
