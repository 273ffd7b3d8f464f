//! Handler registry and dispatch contract
//!
//! The registry maps a stable type name to a [`HandlerDescriptor`]. A descriptor
//! names its executable either as a built-in handler or as an externally supplied
//! function registered under a name, and states whether the handler runs once per
//! record or once per batch.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::engine::Formatter;
use crate::error::{Error, Result};
use crate::handlers::Builtin;
use crate::options::FieldOption;
use crate::record::Record;
use crate::rule::FieldRule;
use crate::value::Value;
use indexmap::IndexMap;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Collective key meaning "key by a content hash of the field's raw value"
pub const HASH_KEY: &str = "_MD5_";

/// How a handler sees the batch
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawCollective", into = "RawCollective")]
pub enum Collective {
    /// Invoked once per record
    #[default]
    PerRecord,
    /// Invoked once per batch with the unique values of the source property
    Batch,
    /// Batch dispatch, results looked up by the named record property
    BatchBy(String),
    /// Batch dispatch, results looked up by a content hash of the field value
    BatchByHash,
}

impl Collective {
    pub fn is_collective(&self) -> bool {
        !matches!(self, Collective::PerRecord)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCollective {
    Flag(bool),
    Key(String),
}

impl From<RawCollective> for Collective {
    fn from(raw: RawCollective) -> Self {
        match raw {
            RawCollective::Flag(false) => Collective::PerRecord,
            RawCollective::Flag(true) => Collective::Batch,
            RawCollective::Key(key) if key == HASH_KEY => Collective::BatchByHash,
            RawCollective::Key(key) => Collective::BatchBy(key),
        }
    }
}

impl From<Collective> for RawCollective {
    fn from(collective: Collective) -> Self {
        match collective {
            Collective::PerRecord => RawCollective::Flag(false),
            Collective::Batch => RawCollective::Flag(true),
            Collective::BatchBy(key) => RawCollective::Key(key),
            Collective::BatchByHash => RawCollective::Key(HASH_KEY.to_string()),
        }
    }
}

/// Where a descriptor's executable lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerRef {
    Builtin(Builtin),
    /// A function registered on the registry under this name
    Function(String),
}

/// Registry entry for one handler type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerDescriptor {
    pub handler: HandlerRef,
    #[serde(default)]
    pub collective: Collective,
    /// Record property collected for batch dispatch instead of the rule's field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl HandlerDescriptor {
    pub fn builtin(builtin: Builtin) -> Self {
        Self {
            handler: HandlerRef::Builtin(builtin),
            collective: Collective::PerRecord,
            field: None,
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self {
            handler: HandlerRef::Function(name.into()),
            collective: Collective::PerRecord,
            field: None,
        }
    }

    pub fn collective(mut self, collective: Collective) -> Self {
        self.collective = collective;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_collective(&self) -> bool {
        self.collective.is_collective()
    }
}

/// Everything a handler gets besides the value itself
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    /// Engine to re-enter for nested formatting
    pub formatter: &'a Formatter,
    pub field: &'a str,
    pub rule: &'a FieldRule,
    pub option: &'a FieldOption,
}

/// A change a handler makes to the record's shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordMutation {
    /// Drop the field
    Remove,
    /// Move the field's value under another name
    MoveTo(String),
}

impl RecordMutation {
    pub fn apply(&self, field: &str, record: &mut Record) {
        match self {
            RecordMutation::Remove => {
                record.remove(field);
            }
            RecordMutation::MoveTo(to) => {
                let value = record.remove(field).unwrap_or_default();
                record.insert(to.as_str(), value);
            }
        }
    }
}

/// What a per-record handler produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A new value for the field; null leaves the field untouched
    Value(Value),
    /// A change to the record itself
    Mutate(RecordMutation),
}

impl Outcome {
    pub fn none() -> Self {
        Outcome::Value(Value::Null)
    }

    /// The produced value; a mutation has none
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Value(value) => value,
            Outcome::Mutate(_) => Value::Null,
        }
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Outcome::Value(value)
    }
}

/// Batch results keyed by the textual form of each unique input value
pub type CollectiveValues = IndexMap<String, Value>;

pub type RecordFn = dyn Fn(Value, &mut Record, &HandlerContext<'_>) -> Result<Outcome> + Send + Sync;
pub type BatchFn =
    dyn Fn(&[Value], &[Record], &HandlerContext<'_>) -> Result<CollectiveValues> + Send + Sync;

/// An externally supplied handler function
#[derive(Clone)]
pub enum HandlerFn {
    Record(Arc<RecordFn>),
    Batch(Arc<BatchFn>),
}

impl fmt::Debug for HandlerFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerFn::Record(_) => f.write_str("HandlerFn::Record"),
            HandlerFn::Batch(_) => f.write_str("HandlerFn::Batch"),
        }
    }
}

/// Name → descriptor table plus the functions descriptors may reference
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    types: IndexMap<String, HandlerDescriptor>,
    functions: HashMap<String, HandlerFn>,
}

impl HandlerRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The default handler table, every built-in handler under its own name plus
    /// the `bool` and `std-id` aliases
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for builtin in Builtin::ALL {
            registry.register(builtin.name(), HandlerDescriptor::builtin(*builtin));
        }
        registry.register("bool", HandlerDescriptor::builtin(Builtin::Boolean));
        registry.register("std-id", HandlerDescriptor::builtin(Builtin::Identifier));
        registry
    }

    /// Register or replace a handler type
    pub fn register(&mut self, name: impl Into<String>, descriptor: HandlerDescriptor) -> &mut Self {
        self.types.insert(name.into(), descriptor);
        self
    }

    pub fn with_type(mut self, name: impl Into<String>, descriptor: HandlerDescriptor) -> Self {
        self.register(name, descriptor);
        self
    }

    /// Register a per-record function under `name`
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(Value, &mut Record, &HandlerContext<'_>) -> Result<Outcome> + Send + Sync + 'static,
    {
        self.functions
            .insert(name.into(), HandlerFn::Record(Arc::new(function)));
        self
    }

    /// Register a batch function under `name`
    pub fn register_collective_function<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&[Value], &[Record], &HandlerContext<'_>) -> Result<CollectiveValues>
            + Send
            + Sync
            + 'static,
    {
        self.functions
            .insert(name.into(), HandlerFn::Batch(Arc::new(function)));
        self
    }

    pub fn descriptor(&self, type_name: &str) -> Result<&HandlerDescriptor> {
        self.types
            .get(type_name)
            .ok_or_else(|| Error::handler_not_found(type_name))
    }

    pub fn function(&self, name: &str) -> Result<&HandlerFn> {
        self.functions
            .get(name)
            .ok_or_else(|| Error::handler_not_found(name))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut functions: Vec<_> = self.functions.keys().collect();
        functions.sort();
        f.debug_struct("HandlerRegistry")
            .field("types", &self.types)
            .field("functions", &functions)
            .finish()
    }
}

/// Content hash used for `_MD5_` collective keys
pub fn content_hash(value: &Value) -> String {
    hex::encode(Md5::digest(value.to_text().as_bytes()))
}
