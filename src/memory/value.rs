//! Runtime value representation
//!
//! This module defines the [`Value`] enum, the closed set of values a traced program
//! can hold. Values follow JavaScript's loose typing closely enough for teaching
//! demos: numbers are `f64`, `+` concatenates when either side is text, and
//! comparisons coerce.
//!
//! # Value Types
//!
//! - [`Value::Number`]: IEEE-754 double
//! - [`Value::String`]: quoted literal with the quotes stripped
//! - [`Value::Boolean`]: `true` / `false`
//! - [`Value::Undefined`]: missing argument or the `undefined` literal
//! - [`Value::Null`]: the `null` literal
//! - [`Value::Opaque`]: expression text the evaluator could not classify
//!
//! # Opaque Fallback
//!
//! An unrecognised expression never fails evaluation. Its text is kept verbatim as
//! `Opaque` so the trace still shows what the line said.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Runtime values in the tracer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Number(#[serde(with = "js_number")] f64),
    String(String),
    Boolean(bool),
    #[default]
    Undefined,
    Null,
    Opaque(String), // Unevaluated expression text
}

/// Type tag shown next to a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    String,
    Boolean,
    Undefined,
    Null,
    Opaque,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// Get the number, returns None if not a Number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text content of String and Opaque values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Opaque(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::String(_) | Value::Opaque(_))
    }

    /// JavaScript truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) | Value::Opaque(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::Undefined | Value::Null => false,
        }
    }

    /// JavaScript `ToNumber` coercion
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Boolean(true) => 1.0,
            Value::Boolean(false) => 0.0,
            Value::Null => 0.0,
            Value::Undefined => f64::NAN,
            Value::String(s) | Value::Opaque(s) => parse_numeric_text(s),
        }
    }

    /// Loose equality (`==`)
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (a, b) if a.is_text() && b.is_text() => a.as_text() == b.as_text(),
            (a, b) => a.to_number() == b.to_number(),
        }
    }

    /// Relational comparison; `None` when either side coerces to NaN
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self.as_text(), other.as_text()) {
            (Some(a), Some(b)) => Some(a.cmp(b)),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }

    /// Format for trace details: text values are quoted, everything else matches
    /// [`Display`](fmt::Display)
    pub fn to_literal(&self) -> String {
        match self {
            Value::String(s) | Value::Opaque(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }
}

/// Stringifies like JavaScript's `String(value)`
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) | Value::Opaque(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
        }
    }
}

/// JavaScript `Number.prototype.toString()` for base 10
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // covers -0
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        format_exponential(n)
    } else {
        n.to_string()
    }
}

/// `1.5e+22` / `1e-7`: shortest round-trip digits with an explicit exponent sign
fn format_exponential(n: f64) -> String {
    let text = format!("{:e}", n);
    match text.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{}e{}", mantissa, exp),
        Some((mantissa, exp)) => format!("{}e+{}", mantissa, exp),
        None => text,
    }
}

/// JSON has no NaN or infinities; those are written as their display text
mod js_number {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if n.is_finite() {
            serializer.serialize_f64(*n)
        } else {
            serializer.serialize_str(&super::format_number(*n))
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(text) => match text.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid number '{}'", other))),
            },
        }
    }
}

/// Numeric text coercion. Empty text is 0; anything that is not a plain decimal
/// number is NaN.
fn parse_numeric_text(text: &str) -> f64 {
    let text = text.trim();
    match text {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let plain = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !plain {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}
