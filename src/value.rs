//! # Host value bridge
//!
//! Two-way conversion between the CST and plain host data. [`Value`] is
//! the host-native type — the `parse_to_value` entry points and the
//! mutation engine's value arguments both go through it.
//!
//! Object key order is significant and preserved end-to-end, so the
//! bridge uses [`indexmap::IndexMap`] rather than a hashing map — the
//! same order-preserving choice this codebase's grammar-ingestion code
//! makes for JSON-shaped data.

use crate::error::ConversionError;
use crate::escape::encode_string_literal;
use crate::options::ParseOptions;
use crate::parser::parse;
use crate::tree::{CstNode, CstValue, Root};
use indexmap::IndexMap;
use std::fmt;

/// A host-native JSON value. Order-preserving for objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
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

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<IndexMap<String, T>> for Value {
    fn from(map: IndexMap<String, T>) -> Self {
        Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", encode_string_literal(s)),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {v}", encode_string_literal(k))?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Canonical source-text rendering of a finite number: integral values
/// print without a trailing `.0` (`42`, not `42.0`); everything else uses
/// Rust's default float formatting. This is used only when *synthesizing*
/// a fresh number literal — an existing `NumberLit`'s `number_value()`
/// always returns the original source text untouched.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Convert a CST value node into a host [`Value`].
pub fn to_value(value: &CstValue) -> Result<Value, ConversionError> {
    match value {
        CstValue::Null(_) => Ok(Value::Null),
        CstValue::Boolean(b) => Ok(Value::Bool(b.value())),
        CstValue::Number(n) => {
            let text = n.number_value();
            let digits = text.trim_start_matches(['+', '-']);
            let parsed = if digits.starts_with("0x") || digits.starts_with("0X") {
                i64::from_str_radix(&digits[2..], 16)
                    .ok()
                    .map(|v| if text.starts_with('-') { -v } else { v } as f64)
            } else {
                text.parse::<f64>().ok()
            };
            match parsed {
                Some(n) if n.is_finite() => Ok(Value::Number(n)),
                // Overflow or a non-finite parse: fall back to the literal
                // source text rather than lose information silently. The
                // spec places this string in the bridged value itself —
                // there is no separate "big number" variant in `Value`.
                _ => Ok(Value::String(text.to_string())),
            }
        }
        CstValue::String(s) => Ok(Value::String(s.decoded_value())),
        CstValue::Object(obj) => {
            let mut map = IndexMap::new();
            for prop in obj.properties() {
                let name = prop
                    .name()
                    .ok_or_else(|| ConversionError::new("object property has no name"))?;
                let value = prop
                    .value()
                    .ok_or_else(|| ConversionError::new("object property has no value"))?;
                map.insert(name.decoded_value(), to_value(&value)?);
            }
            Ok(Value::Object(map))
        }
        CstValue::Array(arr) => {
            let items: Result<Vec<Value>, ConversionError> =
                arr.elements().map(|e| to_value(&e)).collect();
            Ok(Value::Array(items?))
        }
    }
}

/// Parse `text` and convert its root value directly to a [`Value`].
/// Equivalent to `to_value(parse(text, opts)?.value())`, exactly as
/// `spec.md` §4.6 defines it — this crate does not maintain a second,
/// fused tokenizer/parser pipeline for the "fast path".
pub fn parse_to_value(text: &str, options: ParseOptions) -> Result<Value, crate::JsoncError> {
    let syntax = parse(text, options)?;
    let root = Root::cast(syntax).expect("parser always produces a ROOT node");
    let value = root.value_or_throw()?;
    Ok(to_value(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn value_of(src: &str) -> Value {
        parse_to_value(src, ParseOptions::permissive()).unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(value_of("null"), Value::Null);
        assert_eq!(value_of("true"), Value::Bool(true));
        assert_eq!(value_of("42"), Value::Number(42.0));
        assert_eq!(value_of(r#""hi""#), Value::String("hi".to_string()));
    }

    #[test]
    fn array_and_object_preserve_order() {
        let v = value_of(r#"{"b": 1, "a": 2}"#);
        match v {
            Value::Object(map) => {
                let keys: Vec<_> = map.keys().cloned().collect();
                assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn nested_array() {
        let v = value_of("[1, [2, 3], null]");
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Number(1.0),
                Value::Array(vec![Value::Number(2.0), Value::Number(3.0)]),
                Value::Null,
            ])
        );
    }

    #[test]
    fn hexadecimal_number_bridges_to_a_double() {
        assert_eq!(value_of("0x1F"), Value::Number(31.0));
    }

    #[test]
    fn display_matches_canonical_json() {
        let v = Value::Object(IndexMap::from([("a".to_string(), Value::Number(1.0))]));
        assert_eq!(v.to_string(), r#"{"a": 1}"#);
    }

    #[test]
    fn format_number_boundary() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(42.5), "42.5");
    }
}
