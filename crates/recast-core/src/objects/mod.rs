//! Typed value wrappers produced by handlers
//!
//! Every wrapper is immutable once built and exposes a canonical string form
//! (`Display`) and a canonical structured form (`Serialize`).
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

mod datetime;
mod embed;
mod identifier;
mod interval;
mod number;
mod text;

pub use datetime::DateTime;
pub use embed::{MediaEmbed, MediaResolver, ProviderResolver, ResolvedMedia};
pub use identifier::Identifier;
pub use interval::{DurationParts, Interval};
pub use number::Number;
pub use text::Text;

use crate::value::Value;
use serde::{Serialize, Serializer};
use std::fmt;

/// Any wrapper a handler can place into a record
#[derive(Debug, Clone, PartialEq)]
pub enum Typed {
    Text(Text),
    Number(Number),
    DateTime(DateTime),
    Interval(Interval),
    Identifier(Identifier),
    Embed(MediaEmbed),
}

impl Typed {
    /// Short name of the wrapper kind
    pub fn kind(&self) -> &'static str {
        match self {
            Typed::Text(_) => "text",
            Typed::Number(_) => "number",
            Typed::DateTime(_) => "date",
            Typed::Interval(_) => "interval",
            Typed::Identifier(_) => "identifier",
            Typed::Embed(_) => "embed",
        }
    }
}

impl fmt::Display for Typed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typed::Text(inner) => fmt::Display::fmt(inner, f),
            Typed::Number(inner) => fmt::Display::fmt(inner, f),
            Typed::DateTime(inner) => fmt::Display::fmt(inner, f),
            Typed::Interval(inner) => fmt::Display::fmt(inner, f),
            Typed::Identifier(inner) => fmt::Display::fmt(inner, f),
            Typed::Embed(inner) => fmt::Display::fmt(inner, f),
        }
    }
}

impl Serialize for Typed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Typed::Text(inner) => inner.serialize(serializer),
            Typed::Number(inner) => inner.serialize(serializer),
            Typed::DateTime(inner) => inner.serialize(serializer),
            Typed::Interval(inner) => inner.serialize(serializer),
            Typed::Identifier(inner) => inner.serialize(serializer),
            Typed::Embed(inner) => inner.serialize(serializer),
        }
    }
}

macro_rules! impl_wrapper_conversions {
    ($($wrapper:ident => $variant:ident),+ $(,)?) => {
        $(
            impl From<$wrapper> for Typed {
                fn from(inner: $wrapper) -> Self {
                    Typed::$variant(inner)
                }
            }

            impl From<$wrapper> for Value {
                fn from(inner: $wrapper) -> Self {
                    Value::Typed(Typed::$variant(inner))
                }
            }
        )+
    };
}

impl_wrapper_conversions! {
    Text => Text,
    Number => Number,
    DateTime => DateTime,
    Interval => Interval,
    Identifier => Identifier,
    MediaEmbed => Embed,
}
