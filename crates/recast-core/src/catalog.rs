//! Format lookup
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::rule::FormatSpec;
use indexmap::IndexMap;

/// Read-only view of wherever format definitions live
pub trait FormatSource: Send + Sync {
    /// Look up a format by name
    fn format(&self, name: &str) -> Option<FormatSpec>;
}

/// In-memory format store
#[derive(Debug, Clone, Default)]
pub struct FormatCatalog {
    formats: IndexMap<String, FormatSpec>,
}

impl FormatCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: FormatSpec) -> Option<FormatSpec> {
        self.formats.insert(name.into(), spec)
    }

    pub fn with_format(mut self, name: impl Into<String>, spec: FormatSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FormatSpec> {
        self.formats.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl FormatSource for FormatCatalog {
    fn format(&self, name: &str) -> Option<FormatSpec> {
        self.formats.get(name).cloned()
    }
}

impl FromIterator<(String, FormatSpec)> for FormatCatalog {
    fn from_iter<I: IntoIterator<Item = (String, FormatSpec)>>(iter: I) -> Self {
        Self {
            formats: iter.into_iter().collect(),
        }
    }
}
