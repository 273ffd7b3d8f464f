//! Error types for configuration loading
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory traversal errors
    #[error("Failed to scan directory '{path}': {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Failed to parse YAML file '{path}': {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON file '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unsupported file format for '{path}'. Expected .yaml, .yml, or .json")]
    UnsupportedFormat { path: PathBuf },

    /// The file parsed but is not a `{ formats, handlers }` document
    #[error("Invalid configuration document '{path}': {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    /// A name defined twice while loading in strict mode
    #[error("Duplicate {kind} '{name}' in '{path}'")]
    Duplicate {
        kind: &'static str,
        name: String,
        path: PathBuf,
    },

    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },
}

impl ConfigError {
    pub fn io(path: &Path, error: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source: error,
        }
    }

    pub fn walk(path: &Path, error: walkdir::Error) -> Self {
        Self::Walk {
            path: path.to_path_buf(),
            source: error,
        }
    }

    pub fn yaml(path: &Path, error: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.to_path_buf(),
            source: error,
        }
    }

    pub fn json(path: &Path, error: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source: error,
        }
    }

    pub fn unsupported_format(path: &Path) -> Self {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
        }
    }

    pub fn invalid_document(path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn duplicate(kind: &'static str, name: impl Into<String>, path: &Path) -> Self {
        Self::Duplicate {
            kind,
            name: name.into(),
            path: path.to_path_buf(),
        }
    }

    /// Get the path associated with this error
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Walk { path, .. }
            | Self::Yaml { path, .. }
            | Self::Json { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::InvalidDocument { path, .. }
            | Self::Duplicate { path, .. }
            | Self::NotADirectory { path } => path,
        }
    }

    /// Whether a lenient directory scan may skip the file that raised this error
    pub fn is_skippable(&self) -> bool {
        !matches!(self, Self::Duplicate { .. } | Self::NotADirectory { .. })
    }
}
