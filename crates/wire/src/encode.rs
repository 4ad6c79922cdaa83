//! Value-to-text encoding.
//!
//! The encoder writes into a single output buffer. Object keys are sorted
//! before emission so the output is deterministic; the fingerprint of an
//! initial value and the stored form of a cell both depend on that.

use base64::Engine;
use cellar_core::Value;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Encode a value to its stored text form.
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => write_float(out, *f),
        Value::String(s) => write_string(out, s),
        Value::Bytes(b) => write_bytes(out, b),
        Value::Array(items) => write_array(out, items),
        Value::Object(entries) => write_object(out, entries),
    }
}

fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str(r#"{"$f64":"NaN"}"#);
    } else if f == f64::INFINITY {
        out.push_str(r#"{"$f64":"+Inf"}"#);
    } else if f == f64::NEG_INFINITY {
        out.push_str(r#"{"$f64":"-Inf"}"#);
    } else if f.to_bits() == (-0.0f64).to_bits() {
        out.push_str(r#"{"$f64":"-0.0"}"#);
    } else {
        // Whole floats keep a decimal point so they decode as floats
        let text = f.to_string();
        out.push_str(&text);
        if !text.contains(['.', 'e', 'E']) {
            out.push_str(".0");
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_bytes(out: &mut String, bytes: &[u8]) {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    let _ = write!(out, r#"{{"$bytes":"{b64}"}}"#);
}

fn write_array(out: &mut String, items: &[Value]) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, item);
    }
    out.push(']');
}

fn write_object(out: &mut String, entries: &HashMap<String, Value>) {
    let mut sorted: Vec<_> = entries.iter().collect();
    sorted.sort_by_key(|(k, _)| k.as_str());

    out.push('{');
    for (i, (key, item)) in sorted.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(out, key);
        out.push(':');
        write_value(out, item);
    }
    out.push('}');
}
