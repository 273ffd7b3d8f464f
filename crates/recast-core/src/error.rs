//! Error types for the Recast core library
//!
//! Two failures are part of the engine contract: [`Error::FormatNotFound`] for an
//! unknown format name and [`Error::HandlerNotFound`] for a rule naming an
//! unregistered type. Both abort the whole call. The remaining variants cover
//! handler parameter validation, value parsing and errors raised by externally
//! supplied handler functions.

use thiserror::Error;

/// Main error type for Recast operations
#[derive(Error, Debug)]
pub enum Error {
    /// A format name could not be resolved through the format source
    #[error("Format named `{format}` not exists")]
    FormatNotFound { format: String },

    /// A rule or a `custom` handler names something the registry does not know
    #[error("Handler for formatter type `{handler}` not found")]
    HandlerNotFound { handler: String },

    /// Nested path resolution walked into a missing key
    #[error("Path `{path}` cannot be resolved: missing key `{segment}`")]
    PathNotFound { path: String, segment: String },

    /// Handler-specific rule parameters are missing or malformed
    #[error("Invalid rule for field `{field}`: {message}")]
    InvalidRule { field: String, message: String },

    /// A raw value could not be converted into its typed wrapper
    #[error("Invalid {kind} value `{value}`: {message}")]
    InvalidValue {
        kind: &'static str,
        value: String,
        message: String,
    },

    /// The descriptor's collectivity does not match the referenced function
    #[error("Handler `{handler}` cannot be used as a {expected} handler")]
    HandlerMismatch {
        handler: String,
        expected: &'static str,
    },

    /// Failure raised inside an externally supplied handler function
    #[error("Handler `{handler}` failed: {source}")]
    Handler {
        handler: String,
        #[source]
        source: anyhow::Error,
    },

    /// Rule or record (de)serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn format_not_found(format: impl Into<String>) -> Self {
        Error::FormatNotFound {
            format: format.into(),
        }
    }

    pub fn handler_not_found(handler: impl Into<String>) -> Self {
        Error::HandlerNotFound {
            handler: handler.into(),
        }
    }

    pub fn path_not_found(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Error::PathNotFound {
            path: path.into(),
            segment: segment.into(),
        }
    }

    pub fn handler_mismatch(handler: impl Into<String>, expected: &'static str) -> Self {
        Error::HandlerMismatch {
            handler: handler.into(),
            expected,
        }
    }

    pub fn invalid_rule(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidRule {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_value(
        kind: &'static str,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::InvalidValue {
            kind,
            value: value.into(),
            message: message.into(),
        }
    }

    /// Wrap an error raised by an external handler function
    pub fn handler(handler: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Error::Handler {
            handler: handler.into(),
            source: source.into(),
        }
    }

    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            message: message.into(),
            source,
        }
    }

    /// True for the two failures that abort a formatting call before any record is touched
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Error::FormatNotFound { .. } | Error::HandlerNotFound { .. }
        )
    }
}
