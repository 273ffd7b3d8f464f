//! YAML and JSON parsing for configuration files
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl FileFormat {
    const ALL: [FileFormat; 2] = [FileFormat::Yaml, FileFormat::Json];

    /// Detect format from file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ConfigError::unsupported_format(path))?;

        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
            .ok_or_else(|| ConfigError::unsupported_format(path))
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileFormat::Yaml => &["yaml", "yml"],
            FileFormat::Json => &["json"],
        }
    }

    /// Whether `path` carries an extension this parser understands
    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}

/// Parses configuration files into JSON values
#[derive(Debug, Default)]
pub struct ConfigParser;

impl ConfigParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a file, detecting format from extension
    pub fn parse_file(&self, path: &Path) -> ConfigResult<Value> {
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        self.parse_content(&content, format, path)
    }

    /// Parse content with an explicit format; `path` is only used for error context
    pub fn parse_content(&self, content: &str, format: FileFormat, path: &Path) -> ConfigResult<Value> {
        match format {
            FileFormat::Yaml => self.parse_yaml(content, path),
            FileFormat::Json => self.parse_json(content, path),
        }
    }

    pub fn parse_yaml(&self, content: &str, path: &Path) -> ConfigResult<Value> {
        let yaml_value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::yaml(path, e))?;

        // Non-string mapping keys cannot become JSON objects
        serde_json::to_value(yaml_value).map_err(|e| ConfigError::json(path, e))
    }

    pub fn parse_json(&self, content: &str, path: &Path) -> ConfigResult<Value> {
        serde_json::from_str(content).map_err(|e| ConfigError::json(path, e))
    }
}
