//! Number wrapper with decimal precision

use crate::value::Value;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

fn leading_number() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| {
        Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").expect("number pattern is valid")
    })
}

/// Parse the numeric prefix of a string, `0` when there is none
fn parse_numeric_prefix(input: &str) -> f64 {
    leading_number()
        .find(input)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn round_to(value: f64, decimal: u32) -> f64 {
    let factor = 10f64.powi(decimal as i32);
    (value * factor).round() / factor
}

/// A number carrying its raw input and decimal precision
///
/// The canonical value truncates toward zero when the precision is `0` and is
/// rounded half away from zero otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    raw: String,
    decimal: u32,
    value: f64,
}

impl Number {
    pub fn new(raw: &Value, decimal: u32) -> Self {
        let parsed = match raw {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Typed(typed) => parse_numeric_prefix(&typed.to_string()),
            other => parse_numeric_prefix(&other.to_text()),
        };

        let value = if decimal == 0 {
            parsed.trunc()
        } else {
            round_to(parsed, decimal)
        };

        Self {
            raw: raw.to_text(),
            decimal,
            value,
        }
    }

    /// The raw input in its textual form
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn decimal(&self) -> u32 {
        self.decimal
    }

    /// The canonical numeric value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Locale-style rendering with `,` as decimal and `.` as thousands separator
    pub fn format(&self, decimals: u32) -> String {
        self.format_with(decimals, ",", ".")
    }

    /// Render with explicit decimal places and separators
    pub fn format_with(&self, decimals: u32, decimal_sep: &str, thousands_sep: &str) -> String {
        let rounded = round_to(self.value, decimals);
        let digits = format!("{:.*}", decimals as usize, rounded.abs());
        let (integer, fraction) = match digits.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (digits.as_str(), None),
        };

        let mut grouped = String::with_capacity(digits.len() + integer.len() / 3);
        for (i, c) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push_str(thousands_sep);
            }
            grouped.push(c);
        }

        let mut result = String::new();
        if rounded < 0.0 {
            result.push('-');
        }
        result.push_str(&grouped);
        if let Some(fraction) = fraction {
            result.push_str(decimal_sep);
            result.push_str(fraction);
        }
        result
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.decimal == 0 {
            write!(f, "{}", self.value as i64)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.decimal == 0 {
            serializer.serialize_i64(self.value as i64)
        } else {
            serializer.serialize_f64(self.value)
        }
    }
}
