use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// A bare reference to another entity, serialized as `{"id": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    id: Box<Value>,
}

impl Identifier {
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: Box::new(id.into()),
        }
    }

    pub fn id(&self) -> &Value {
        &self.id
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id.to_text())
    }
}
