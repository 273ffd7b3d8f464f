//! Dynamic value representation for record fields
//!
//! A [`Value`] is whatever a record field can hold: a scalar, a nested
//! [`Record`], a list, or a [`Typed`] wrapper produced by a handler. Records are
//! never bound to a compile-time schema; handlers operate on this structure.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::objects::{DateTime, Identifier, Interval, MediaEmbed, Number, Text, Typed};
use crate::record::Record;
use serde::{Serialize, Serializer};
use serde_json::Number as JsonNumber;
use std::fmt;

/// A dynamically-typed record field value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(JsonNumber),
    String(String),
    List(Vec<Value>),
    Record(Record),
    /// A serialization-ready wrapper produced by a handler
    Typed(Typed),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_typed(&self) -> Option<&Typed> {
        match self {
            Value::Typed(typed) => Some(typed),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Value::Typed(Typed::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Typed(Typed::Number(number)) => Some(number),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime> {
        match self {
            Value::Typed(Typed::DateTime(date)) => Some(date),
            _ => None,
        }
    }

    pub fn as_interval(&self) -> Option<&Interval> {
        match self {
            Value::Typed(Typed::Interval(interval)) => Some(interval),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Value::Typed(Typed::Identifier(id)) => Some(id),
            _ => None,
        }
    }

    pub fn as_embed(&self) -> Option<&MediaEmbed> {
        match self {
            Value::Typed(Typed::Embed(embed)) => Some(embed),
            _ => None,
        }
    }

    /// Loose truthiness: empty strings, `"0"`, zero, empty lists and null are false
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Value::String(s) => !(s.is_empty() || s == "0"),
            Value::List(items) => !items.is_empty(),
            Value::Record(_) | Value::Typed(_) => true,
        }
    }

    /// Numeric reading of the value, if it has one
    ///
    /// Strings count only when the whole trimmed string parses as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Typed(Typed::Number(number)) => Some(number.value()),
            Value::Typed(Typed::Text(text)) => text.value().trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Canonical textual form
    ///
    /// Wrappers use their own string form, `true` reads as `"1"`, `false` and
    /// null read as the empty string, containers render as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => String::new(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::List(_) | Value::Record(_) => self.to_json().to_string(),
            Value::Typed(typed) => typed.to_string(),
        }
    }

    /// Canonical structured form, with wrappers replaced by their serialization
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Build a number value from a float, falling back to null for NaN and infinities
    pub fn from_f64(value: f64) -> Self {
        JsonNumber::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => items.serialize(serializer),
            Value::Record(record) => record.serialize(serializer),
            Value::Typed(typed) => typed.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::from_f64(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Typed> for Value {
    fn from(typed: Typed) -> Self {
        Value::Typed(typed)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
