//! Built-in handler set
//!
//! Every built-in handler runs per record and shares the signature
//! `(value, record, context) -> Outcome`. Handlers that only reshape the record
//! (`delete`, `rename`) return [`Outcome::Mutate`]; the rest return a value.
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

mod scalar;
mod structural;
mod switch;

pub use switch::{Case, Operator};

use crate::error::{Error, Result};
use crate::record::Record;
use crate::registry::{HandlerContext, Outcome};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names of the handlers shipped with the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Builtin {
    Boolean,
    Clone,
    Custom,
    Date,
    Delete,
    Embed,
    Interval,
    MultipleText,
    Number,
    Text,
    Json,
    Join,
    Rename,
    Identifier,
    Switch,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Builtin::Boolean,
        Builtin::Clone,
        Builtin::Custom,
        Builtin::Date,
        Builtin::Delete,
        Builtin::Embed,
        Builtin::Interval,
        Builtin::MultipleText,
        Builtin::Number,
        Builtin::Text,
        Builtin::Json,
        Builtin::Join,
        Builtin::Rename,
        Builtin::Identifier,
        Builtin::Switch,
    ];

    /// The type name the handler is registered under by default
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Boolean => "boolean",
            Builtin::Clone => "clone",
            Builtin::Custom => "custom",
            Builtin::Date => "date",
            Builtin::Delete => "delete",
            Builtin::Embed => "embed",
            Builtin::Interval => "interval",
            Builtin::MultipleText => "multiple-text",
            Builtin::Number => "number",
            Builtin::Text => "text",
            Builtin::Json => "json",
            Builtin::Join => "join",
            Builtin::Rename => "rename",
            Builtin::Identifier => "identifier",
            Builtin::Switch => "switch",
        }
    }

    /// Run the handler for one record
    pub fn apply(self, value: Value, record: &mut Record, ctx: &HandlerContext<'_>) -> Result<Outcome> {
        match self {
            Builtin::Boolean => Ok(scalar::boolean(value)),
            Builtin::Text => Ok(scalar::text(value)),
            Builtin::Number => scalar::number(value, ctx),
            Builtin::Date => scalar::date(value, ctx),
            Builtin::Interval => scalar::interval(value),
            Builtin::Identifier => Ok(scalar::identifier(value)),
            Builtin::Embed => Ok(scalar::embed(value, ctx)),
            Builtin::Delete => Ok(structural::delete()),
            Builtin::Rename => structural::rename(ctx),
            Builtin::MultipleText => structural::multiple_text(value, ctx),
            Builtin::Join => structural::join(record, ctx),
            Builtin::Clone => structural::clone(record, ctx),
            Builtin::Custom => structural::custom(value, record, ctx),
            Builtin::Json => structural::json(value, ctx),
            Builtin::Switch => switch::switch(value, record, ctx),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Builtin {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Builtin::ALL
            .iter()
            .copied()
            .find(|builtin| builtin.name() == name)
            .ok_or_else(|| Error::handler_not_found(name))
    }
}
