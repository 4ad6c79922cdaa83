//! Text-to-value decoding.
//!
//! A hand-rolled recursive-descent reader over the stored text. It accepts
//! exactly what [`encode`](crate::encode) produces, plus ordinary JSON
//! whitespace, and rejects trailing garbage — a stored entry is one value,
//! not a stream.

use base64::Engine;
use cellar_core::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Why a stored entry failed to decode.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Malformed syntax with a human-readable reason.
    #[error("malformed value: {0}")]
    Syntax(String),

    /// Input ended mid-value.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A character that cannot start or continue the current construct.
    #[error("unexpected character: {0:?}")]
    UnexpectedChar(char),

    /// A number that fits neither i64 nor f64.
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// A `$bytes` wrapper whose payload is not valid base64.
    #[error("invalid base64 in $bytes: {0}")]
    InvalidBase64(String),

    /// A `$f64` wrapper with an unknown tag.
    #[error("invalid $f64 tag: {0}")]
    InvalidFloatTag(String),

    /// Extra content after a complete value.
    #[error("trailing data after value")]
    TrailingData,
}

/// Decode stored text back into a value.
pub fn decode(text: &str) -> Result<Value, DecodeError> {
    let mut reader = Reader::new(text);
    reader.skip_whitespace();
    let value = reader.read_value()?;
    reader.skip_whitespace();
    if reader.peek().is_some() {
        return Err(DecodeError::TrailingData);
    }
    Ok(value)
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Reader { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect_literal(&mut self, literal: &str) -> Result<(), DecodeError> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(DecodeError::Syntax(format!("expected `{literal}`")))
        }
    }

    fn read_value(&mut self) -> Result<Value, DecodeError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(DecodeError::UnexpectedEnd),
            Some('n') => self.expect_literal("null").map(|()| Value::Null),
            Some('t') => self.expect_literal("true").map(|()| Value::Bool(true)),
            Some('f') => self.expect_literal("false").map(|()| Value::Bool(false)),
            Some('"') => self.read_string().map(Value::String),
            Some('[') => self.read_array(),
            Some('{') => self.read_object(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.read_number(),
            Some(c) => Err(DecodeError::UnexpectedChar(c)),
        }
    }

    fn read_number(&mut self) -> Result<Value, DecodeError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    self.bump();
                }
                '.' | 'e' | 'E' | '+' | '-' => {
                    is_float = true;
                    self.bump();
                }
                _ => break,
            }
        }

        let text = &self.input[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|_| DecodeError::InvalidNumber(text.to_string()))
        } else {
            // Plain digit runs are integers; anything too large for i64 is
            // out of the encoder's range and treated as corrupt
            text.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| DecodeError::InvalidNumber(text.to_string()))
        }
    }

    fn read_string(&mut self) -> Result<String, DecodeError> {
        self.bump(); // opening quote
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(DecodeError::UnexpectedEnd),
                Some('"') => return Ok(out),
                Some('\\') => out.push(self.read_escape()?),
                Some(c) => out.push(c),
            }
        }
    }

    fn read_escape(&mut self) -> Result<char, DecodeError> {
        match self.bump() {
            None => Err(DecodeError::UnexpectedEnd),
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('b') => Ok('\x08'),
            Some('f') => Ok('\x0c'),
            Some('u') => self.read_unicode_escape(),
            Some(c) => Err(DecodeError::Syntax(format!("invalid escape: \\{c}"))),
        }
    }

    fn read_unicode_escape(&mut self) -> Result<char, DecodeError> {
        let high = self.read_hex4()?;
        // Surrogate pairs arrive as two consecutive \u escapes
        if (0xD800..=0xDBFF).contains(&high) {
            self.expect_literal("\\u")
                .map_err(|_| DecodeError::Syntax("unpaired surrogate".to_string()))?;
            let low = self.read_hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(DecodeError::Syntax("unpaired surrogate".to_string()));
            }
            let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(code)
                .ok_or_else(|| DecodeError::Syntax("invalid codepoint".to_string()));
        }
        char::from_u32(high).ok_or_else(|| DecodeError::Syntax("invalid codepoint".to_string()))
    }

    fn read_hex4(&mut self) -> Result<u32, DecodeError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let c = self.bump().ok_or(DecodeError::UnexpectedEnd)?;
            let digit = c
                .to_digit(16)
                .ok_or_else(|| DecodeError::Syntax(format!("invalid hex digit: {c}")))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn read_array(&mut self) -> Result<Value, DecodeError> {
        self.bump(); // '['
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Value::Array(items));
        }
        loop {
            items.push(self.read_value()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(items)),
                Some(c) => return Err(DecodeError::UnexpectedChar(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
        }
    }

    fn read_object(&mut self) -> Result<Value, DecodeError> {
        self.bump(); // '{'
        let mut entries = HashMap::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Object(entries));
        }
        loop {
            self.skip_whitespace();
            if self.peek() != Some('"') {
                return Err(DecodeError::Syntax("expected object key".to_string()));
            }
            let key = self.read_string()?;
            self.skip_whitespace();
            match self.bump() {
                Some(':') => {}
                Some(c) => return Err(DecodeError::UnexpectedChar(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
            let value = self.read_value()?;
            entries.insert(key, value);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                Some(c) => return Err(DecodeError::UnexpectedChar(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
        }
        unwrap_special(entries)
    }
}

/// Turn a `$bytes` or `$f64` wrapper object back into its value; anything
/// else stays an ordinary object.
fn unwrap_special(entries: HashMap<String, Value>) -> Result<Value, DecodeError> {
    if entries.len() == 1 {
        if let Some(Value::String(b64)) = entries.get("$bytes") {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(b64)
                .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
            return Ok(Value::Bytes(bytes));
        }
        if let Some(Value::String(tag)) = entries.get("$f64") {
            let f = match tag.as_str() {
                "NaN" => f64::NAN,
                "+Inf" => f64::INFINITY,
                "-Inf" => f64::NEG_INFINITY,
                "-0.0" => -0.0,
                other => return Err(DecodeError::InvalidFloatTag(other.to_string())),
            };
            return Ok(Value::Float(f));
        }
    }
    Ok(Value::Object(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Scalars ===

    #[test]
    fn decodes_scalars() {
        assert_eq!(decode("null").unwrap(), Value::Null);
        assert_eq!(decode("true").unwrap(), Value::Bool(true));
        assert_eq!(decode("false").unwrap(), Value::Bool(false));
        assert_eq!(decode("123").unwrap(), Value::Int(123));
        assert_eq!(decode("-7").unwrap(), Value::Int(-7));
        assert_eq!(decode("1.5").unwrap(), Value::Float(1.5));
        assert_eq!(decode("1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(decode(r#""hi""#).unwrap(), Value::from("hi"));
    }

    #[test]
    fn whitespace_is_tolerated() {
        assert_eq!(decode("  123  ").unwrap(), Value::Int(123));
        assert_eq!(
            decode(" [ 1 , 2 ] ").unwrap(),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn string_escapes_decode() {
        assert_eq!(decode(r#""a\n\t\"b""#).unwrap(), Value::from("a\n\t\"b"));
        assert_eq!(decode(r#""\u0041""#).unwrap(), Value::from("A"));
        // Surrogate pair for U+1F680
        assert_eq!(decode(r#""\ud83d\ude80""#).unwrap(), Value::from("🚀"));
    }

    // === Wrappers ===

    #[test]
    fn bytes_wrapper_decodes() {
        assert_eq!(
            decode(r#"{"$bytes":"SGVsbG8="}"#).unwrap(),
            Value::Bytes(vec![72, 101, 108, 108, 111])
        );
    }

    #[test]
    fn float_wrapper_decodes() {
        assert!(matches!(
            decode(r#"{"$f64":"NaN"}"#).unwrap(),
            Value::Float(f) if f.is_nan()
        ));
        assert_eq!(
            decode(r#"{"$f64":"+Inf"}"#).unwrap(),
            Value::Float(f64::INFINITY)
        );
        assert!(matches!(
            decode(r#"{"$f64":"-0.0"}"#).unwrap(),
            Value::Float(f) if f == 0.0 && f.is_sign_negative()
        ));
    }

    #[test]
    fn unknown_float_tag_is_an_error() {
        assert_eq!(
            decode(r#"{"$f64":"fast"}"#),
            Err(DecodeError::InvalidFloatTag("fast".to_string()))
        );
    }

    #[test]
    fn bad_base64_is_an_error() {
        assert!(matches!(
            decode(r#"{"$bytes":"!!!"}"#),
            Err(DecodeError::InvalidBase64(_))
        ));
    }

    #[test]
    fn wrapper_with_extra_keys_is_plain_data() {
        let decoded = decode(r#"{"$f64":"NaN","x":1}"#).unwrap();
        assert!(matches!(decoded, Value::Object(ref o) if o.len() == 2));
    }

    // === Containers ===

    #[test]
    fn nested_containers_decode() {
        let decoded = decode(r#"{"a":[1,{"b":null}]}"#).unwrap();
        let obj = decoded.as_object().unwrap();
        let arr = obj["a"].as_array().unwrap();
        assert_eq!(arr[0], Value::Int(1));
        assert!(matches!(&arr[1], Value::Object(inner) if inner["b"].is_null()));
    }

    // === Corruption ===

    #[test]
    fn malformed_input_is_rejected() {
        assert!(decode("").is_err());
        assert!(decode("nul").is_err());
        assert!(decode("[1,").is_err());
        assert!(decode(r#"{"k":}"#).is_err());
        assert!(decode(r#""unterminated"#).is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        assert_eq!(decode("123 456"), Err(DecodeError::TrailingData));
        assert_eq!(decode("null x"), Err(DecodeError::TrailingData));
    }

    #[test]
    fn oversized_integers_are_rejected() {
        assert!(matches!(
            decode("99999999999999999999999999"),
            Err(DecodeError::InvalidNumber(_))
        ));
    }
}
