//! Recast Core - declarative, typed field transformation for record batches
//!
//! A named *format* maps output field names to typed rules. The [`Formatter`]
//! applies a format to a batch of loosely-structured records in place, turning
//! raw strings and numbers into serialization-ready wrappers (dates, numbers
//! with precision, sanitized text, joins, conditional results).
//!
//! # Main Components
//!
//! - **Records and values**: [`Record`] and [`Value`], an open ordered mapping
//!   with no compile-time schema
//! - **Typed wrappers**: [`Text`], [`Number`], [`DateTime`], [`Interval`],
//!   [`Identifier`] and [`MediaEmbed`]
//! - **Handler registry**: [`HandlerRegistry`], name to [`HandlerDescriptor`],
//!   built-in or externally supplied, per-record or collective
//! - **Formatting engine**: [`Formatter`], classification, collective batch
//!   dispatch, per-record dispatch and the `@rename` / `@clone` / `@rest`
//!   directives
//!
//! # Example
//!
//! ```
//! use recast_core::{record, FieldRule, FormatCatalog, FormatSpec, Formatter, HandlerRegistry, Options, Result};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let catalog = FormatCatalog::new().with_format(
//!         "post",
//!         FormatSpec::new()
//!             .with_rule("title", FieldRule::new("text"))
//!             .with_rule("created", FieldRule::new("date").with_param("timezone", json!("UTC")))
//!             .with_rule("draft", FieldRule::new("boolean").renamed("is_draft")),
//!     );
//!     let formatter = Formatter::new(catalog, HandlerRegistry::with_builtins());
//!
//!     let posts = vec![
//!         record! { "id" => 1, "title" => "Hello", "created" => "2020-12-04 06:31:23", "draft" => "0" },
//!         record! { "id" => 2, "title" => "World", "created" => "2021-01-01", "draft" => "1" },
//!     ];
//!     let posts = formatter.format_many_keyed("post", posts, &Options::new(), "id")?;
//!
//!     assert_eq!(posts["1"].get("is_draft"), Some(&recast_core::Value::Bool(false)));
//!     assert_eq!(posts["1"].get("created").unwrap().to_text(), "2020-12-04T06:31:23+00:00");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#[macro_use]
mod macros;

pub mod catalog;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod markup;
pub mod objects;
pub mod options;
pub mod path;
pub mod record;
pub mod registry;
pub mod rule;
pub mod value;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use catalog::{FormatCatalog, FormatSource};
pub use engine::Formatter;
pub use error::{Error, Result};
pub use handlers::{Builtin, Case, Operator};
pub use objects::{
    DateTime, DurationParts, Identifier, Interval, MediaEmbed, MediaResolver, Number,
    ProviderResolver, ResolvedMedia, Text, Typed,
};
pub use options::{FieldOption, Options};
pub use record::Record;
pub use registry::{
    content_hash, Collective, CollectiveValues, HandlerContext, HandlerDescriptor, HandlerFn,
    HandlerRef, HandlerRegistry, Outcome, RecordMutation, HASH_KEY,
};
pub use rule::{FieldRule, FormatSpec};
pub use value::Value;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
