//! Per-call, per-field handler options
//!
//! Options are opaque to the engine: each field's entry is forwarded verbatim
//! to that field's handler.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use indexmap::IndexMap;

/// The option supplied for a single field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldOption {
    /// The caller said nothing about the field
    #[default]
    Absent,
    /// The field was named without parameters
    Flag,
    /// The field was named with explicit parameters
    Value(serde_json::Value),
}

impl FieldOption {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldOption::Absent)
    }

    /// Options for a nested formatting call made on behalf of this field
    ///
    /// Only an explicit object (or a list of field names) carries over; flags and
    /// scalars yield empty options.
    pub fn to_options(&self) -> Options {
        match self {
            FieldOption::Value(value @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => {
                Options::from_json(value).unwrap_or_default()
            }
            _ => Options::default(),
        }
    }
}

static ABSENT: FieldOption = FieldOption::Absent;

/// Options for one formatting call, keyed by field name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options {
    fields: IndexMap<String, FieldOption>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name a field without parameters
    pub fn flag(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldOption::Flag);
        self
    }

    /// Give a field explicit parameters
    pub fn set(mut self, field: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(field.into(), FieldOption::Value(value));
        self
    }

    pub fn get(&self, field: &str) -> &FieldOption {
        self.fields.get(field).unwrap_or(&ABSENT)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Read options from JSON
    ///
    /// An object maps field names to parameters (`true` counts as a flag); a
    /// list names flagged fields. Non-string list entries are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let mut options = Self::new();
        match value {
            serde_json::Value::Null => {}
            serde_json::Value::Object(map) => {
                for (field, value) in map {
                    options = match value {
                        serde_json::Value::Bool(true) => options.flag(field.as_str()),
                        other => options.set(field.as_str(), other.clone()),
                    };
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    let field = item.as_str().ok_or_else(|| {
                        Error::invalid_value("options", item.to_string(), "field names must be strings")
                    })?;
                    options = options.flag(field);
                }
            }
            other => {
                return Err(Error::invalid_value(
                    "options",
                    other.to_string(),
                    "expected an object or a list of field names",
                ))
            }
        }
        Ok(options)
    }
}
