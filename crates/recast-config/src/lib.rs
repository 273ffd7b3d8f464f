//! Recast Config - the configuration store behind the formatting engine
//!
//! Reads format definitions and handler declarations from YAML and JSON files
//! into a [`FormatCatalog`](recast_core::FormatCatalog) and a handler table,
//! then hands both to a [`Formatter`](recast_core::Formatter).
//!
//! ## Quick Start
//!
//! ```no_run
//! use recast_config::{ConfigLoader, LoaderOptions};
//! use recast_core::{HandlerRegistry, Options};
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::with_options(LoaderOptions::strict().recursive(true));
//! loader.load_dir(Path::new("config/formats"))?;
//!
//! let formatter = loader.into_formatter(HandlerRegistry::with_builtins());
//! let _posts = formatter.format_many("post", Vec::new(), &Options::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

pub mod document;
pub mod error;
pub mod loader;
pub mod parser;

pub use document::ConfigDocument;
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, LoaderOptions};
pub use parser::{ConfigParser, FileFormat};
