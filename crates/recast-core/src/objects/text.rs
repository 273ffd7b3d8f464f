//! Text wrapper

use crate::markup;
use serde::{Serialize, Serializer};
use std::fmt;

/// Raw text with derived clean, safe and truncated forms
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    value: String,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The raw text as supplied
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Markup and punctuation stripped
    pub fn clean(&self) -> String {
        markup::clean(&self.value)
    }

    /// Markup-escaped, safe to embed in a document
    pub fn safe(&self) -> String {
        markup::escape_markup(&self.value)
    }

    /// The first `count` characters of the clean form
    pub fn chars(&self, count: usize) -> String {
        markup::truncate_chars(&self.clean(), count)
    }

    /// The first `count` words of the clean form
    pub fn words(&self, count: usize) -> String {
        markup::truncate_words(&self.clean(), count)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}
