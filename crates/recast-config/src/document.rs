//! The shape of one configuration file

use crate::error::{ConfigError, ConfigResult};
use indexmap::IndexMap;
use recast_core::{FormatSpec, HandlerDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Format definitions and handler declarations read from a single file
///
/// ```yaml
/// formats:
///   post:
///     title: { type: text }
///     author: { type: user }
/// handlers:
///   user:
///     handler: { function: load_users }
///     collective: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigDocument {
    pub formats: IndexMap<String, FormatSpec>,
    pub handlers: IndexMap<String, HandlerDescriptor>,
}

impl ConfigDocument {
    /// Interpret a parsed file; an empty file is an empty document
    pub fn from_value(value: Value, path: &Path) -> ConfigResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| ConfigError::invalid_document(path, e.to_string())),
            other => Err(ConfigError::invalid_document(
                path,
                format!("expected a mapping at the root, found {}", kind_of(&other)),
            )),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty() && self.handlers.is_empty()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_core::{Builtin, Collective, HandlerRef};
    use serde_json::json;

    #[test]
    fn test_document_from_value() {
        let document = ConfigDocument::from_value(
            json!({
                "formats": {
                    "post": {
                        "title": {"type": "text"},
                        "draft": {"type": "boolean", "@rename": "is_draft"}
                    }
                },
                "handlers": {
                    "user": {"handler": {"function": "load_users"}, "collective": "user_id"},
                    "flag": {"handler": {"builtin": "boolean"}}
                }
            }),
            Path::new("app.json"),
        )
        .unwrap();

        let post = &document.formats["post"];
        assert_eq!(post.len(), 2);
        assert_eq!(post.get("draft").and_then(|r| r.rename.as_deref()), Some("is_draft"));

        let user = &document.handlers["user"];
        assert_eq!(user.handler, HandlerRef::Function("load_users".into()));
        assert_eq!(user.collective, Collective::BatchBy("user_id".into()));
        assert_eq!(document.handlers["flag"].handler, HandlerRef::Builtin(Builtin::Boolean));
    }

    #[test]
    fn test_empty_document() {
        let document = ConfigDocument::from_value(Value::Null, Path::new("empty.yaml")).unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_invalid_documents() {
        let err = ConfigDocument::from_value(json!(["post"]), Path::new("list.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDocument { .. }));
        assert!(err.to_string().contains("found a list"));

        let err = ConfigDocument::from_value(json!({"format": {}}), Path::new("typo.json")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDocument { .. }));

        let err = ConfigDocument::from_value(
            json!({"handlers": {"x": {"handler": {"builtin": "no-such-handler"}}}}),
            Path::new("bad.json"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDocument { .. }));
    }
}
