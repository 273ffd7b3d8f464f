//! Configuration loader building a format catalog and handler table
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::document::ConfigDocument;
use crate::error::{ConfigError, ConfigResult};
use crate::parser::{ConfigParser, FileFormat};
use indexmap::IndexMap;
use recast_core::{FormatCatalog, Formatter, HandlerDescriptor, HandlerRegistry};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for loader behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Fail on a format or handler name defined twice instead of letting the
    /// later definition win
    pub strict: bool,
    /// Descend into subdirectories when loading a directory
    pub recursive: bool,
    /// Skip files that fail to read, parse or validate during a directory scan
    pub lenient: bool,
}

impl LoaderOptions {
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }
}

/// Accumulates configuration documents into a catalog and handler table
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
    parser: ConfigParser,
    catalog: FormatCatalog,
    handlers: IndexMap<String, HandlerDescriptor>,
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoaderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Load a single YAML or JSON file
    pub fn load_file(&mut self, path: &Path) -> ConfigResult<&mut Self> {
        let value = self.parser.parse_file(path)?;
        let document = ConfigDocument::from_value(value, path)?;
        self.merge(document, path)?;
        Ok(self)
    }

    /// Load configuration from a string; `origin` names it in errors
    pub fn load_str(&mut self, content: &str, format: FileFormat, origin: &Path) -> ConfigResult<&mut Self> {
        let value = self.parser.parse_content(content, format, origin)?;
        let document = ConfigDocument::from_value(value, origin)?;
        self.merge(document, origin)?;
        Ok(self)
    }

    /// Load every `.yaml`, `.yml` and `.json` file under `dir` in file name order
    ///
    /// Returns the number of files loaded. Files with other extensions are ignored.
    pub fn load_dir(&mut self, dir: &Path) -> ConfigResult<usize> {
        if !dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let max_depth = if self.options.recursive { usize::MAX } else { 1 };
        let lenient = self.options.lenient;
        let mut loaded = 0;

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if lenient => {
                    warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
                Err(e) => return Err(ConfigError::walk(dir, e)),
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !FileFormat::is_supported(path) {
                continue;
            }

            match self.load_file(path).map(|_| ()) {
                Ok(()) => loaded += 1,
                Err(e) if lenient && e.is_skippable() => {
                    warn!(path = %path.display(), error = %e, "skipping configuration file");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(dir = %dir.display(), files = loaded, "loaded configuration directory");
        Ok(loaded)
    }

    fn merge(&mut self, document: ConfigDocument, path: &Path) -> ConfigResult<()> {
        if self.options.strict {
            if let Some(name) = document.formats.keys().find(|name| self.catalog.contains(name)) {
                return Err(ConfigError::duplicate("format", name.as_str(), path));
            }
            if let Some(name) = document.handlers.keys().find(|name| self.handlers.contains_key(*name)) {
                return Err(ConfigError::duplicate("handler", name.as_str(), path));
            }
        }

        debug!(
            path = %path.display(),
            formats = document.formats.len(),
            handlers = document.handlers.len(),
            "loaded configuration file"
        );

        for (name, spec) in document.formats {
            self.catalog.insert(name, spec);
        }
        self.handlers.extend(document.handlers);
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    /// Handler declarations in the order they were first defined
    pub fn handlers(&self) -> &IndexMap<String, HandlerDescriptor> {
        &self.handlers
    }

    /// Files (or string origins) merged so far, in load order
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Layer the declared handlers over `base`, replacing same-named entries
    pub fn registry(&self, mut base: HandlerRegistry) -> HandlerRegistry {
        for (name, descriptor) in &self.handlers {
            base.register(name.clone(), descriptor.clone());
        }
        base
    }

    /// Build a formatter over the loaded catalog
    ///
    /// `base` supplies the built-in table and any functions registered in code;
    /// declared handlers are layered on top.
    pub fn into_formatter(self, base: HandlerRegistry) -> Formatter {
        let registry = self.registry(base);
        Formatter::new(self.catalog, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_core::Collective;

    const POSTS: &str = r#"
formats:
  post:
    title: { type: text }
handlers:
  user:
    handler: { function: load_users }
    collective: true
"#;

    #[test]
    fn test_load_str_merges_document() {
        let mut loader = ConfigLoader::new();
        loader
            .load_str(POSTS, FileFormat::Yaml, Path::new("posts.yaml"))
            .unwrap();

        assert!(loader.catalog().contains("post"));
        assert_eq!(loader.handlers()["user"].collective, Collective::Batch);
        assert_eq!(loader.sources(), &[PathBuf::from("posts.yaml")]);
    }

    #[test]
    fn test_later_definition_wins() {
        let mut loader = ConfigLoader::new();
        loader
            .load_str(POSTS, FileFormat::Yaml, Path::new("a.yaml"))
            .unwrap()
            .load_str(
                r#"{"formats": {"post": {"body": {"type": "text"}}}}"#,
                FileFormat::Json,
                Path::new("b.json"),
            )
            .unwrap();

        let post = loader.catalog().get("post").unwrap();
        assert!(post.contains("body"));
        assert!(!post.contains("title"));
    }

    #[test]
    fn test_strict_rejects_duplicates_without_merging() {
        let mut loader = ConfigLoader::with_options(LoaderOptions::strict());
        loader.load_str(POSTS, FileFormat::Yaml, Path::new("a.yaml")).unwrap();

        let err = loader
            .load_str(
                r#"{"formats": {"comment": {"body": {"type": "text"}}, "post": {}}}"#,
                FileFormat::Json,
                Path::new("b.json"),
            )
            .unwrap_err();

        assert!(matches!(err, ConfigError::Duplicate { kind: "format", .. }));
        assert!(!loader.catalog().contains("comment"));
        assert_eq!(loader.sources().len(), 1);
    }

    #[test]
    fn test_registry_layers_declared_handlers() {
        let mut loader = ConfigLoader::new();
        loader
            .load_str(
                r#"{"handlers": {"text": {"handler": {"builtin": "number"}}}}"#,
                FileFormat::Json,
                Path::new("override.json"),
            )
            .unwrap();

        let registry = loader.registry(HandlerRegistry::with_builtins());
        assert_eq!(
            registry.descriptor("text").unwrap(),
            &HandlerDescriptor::builtin(recast_core::Builtin::Number)
        );
        assert!(registry.contains("date"));
    }
}
