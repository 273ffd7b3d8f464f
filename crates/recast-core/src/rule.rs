//! Field rules and format specs
//!
//! A [`FormatSpec`] maps output field names to [`FieldRule`]s. Rules carry a
//! handler type name, the optional `@rename` and `@clone` directives and free-form
//! handler parameters which the engine never inspects.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Transformation rule for a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(rename = "type")]
    pub type_name: String,

    /// Move the produced value to this field and drop the original
    #[serde(rename = "@rename", default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,

    /// Copy this field's raw value into the rule's own field before classification
    #[serde(rename = "@clone", default, skip_serializing_if = "Option::is_none")]
    pub clone_from: Option<String>,

    /// Handler-specific parameters
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl FieldRule {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            rename: None,
            clone_from: None,
            params: serde_json::Map::new(),
        }
    }

    pub fn renamed(mut self, to: impl Into<String>) -> Self {
        self.rename = Some(to.into());
        self
    }

    pub fn cloned_from(mut self, source: impl Into<String>) -> Self {
        self.clone_from = Some(source.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    pub fn param(&self, name: &str) -> Option<&serde_json::Value> {
        self.params.get(name)
    }

    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(serde_json::Value::as_str)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::json("invalid field rule", e))
    }
}

/// Ordered mapping of output field name to rule
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatSpec {
    rules: IndexMap<String, FieldRule>,
}

impl FormatSpec {
    /// Key of the rule applied to every property the format does not name
    pub const REST_KEY: &'static str = "@rest";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.insert(field.into(), rule);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, rule: FieldRule) -> Option<FieldRule> {
        self.rules.insert(field.into(), rule)
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.rules.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldRule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove and return the `@rest` rule, if any
    pub fn take_rest(&mut self) -> Option<FieldRule> {
        self.rules.shift_remove(Self::REST_KEY)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::json("invalid format spec", e))
    }
}

impl FromIterator<(String, FieldRule)> for FormatSpec {
    fn from_iter<I: IntoIterator<Item = (String, FieldRule)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
