//! `Parser` — read access to one bound JSON document.
//!
//! A parser either holds a parsed document or nothing; all queries go
//! through the root object. Leaf values are plain [`serde_json::Value`]
//! references, so callers use `is_null`/`as_str`/`as_i64` directly.

use serde_json::Value;

use crate::WireError;

#[derive(Debug, Default)]
pub struct Parser {
    root: Option<Value>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a JSON document to this parser. A malformed document fails
    /// immediately; the parser keeps its previous state in that case.
    pub fn load(&mut self, text: &str) -> Result<(), WireError> {
        let parsed = serde_json::from_str(text)?;
        self.root = Some(parsed);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }

    pub fn ensure_loaded(&self) -> Result<(), WireError> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(WireError::NotLoaded)
        }
    }

    /// Whether `key` is present in the root object. False when the root is
    /// not an object or no document is loaded.
    pub fn exists(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// The relation skip predicate: true when `key` is absent, its value is
    /// null, or its value is an object/array with zero members. A present
    /// scalar is never empty.
    pub fn empty(&self, key: &str) -> bool {
        match self.find(key) {
            None => true,
            Some(Value::Null) => true,
            Some(Value::Object(map)) => map.is_empty(),
            Some(Value::Array(arr)) => arr.is_empty(),
            Some(_) => false,
        }
    }

    /// The value at `key` in the root object, or `None` when absent.
    pub fn find(&self, key: &str) -> Option<&Value> {
        self.root.as_ref()?.as_object()?.get(key)
    }
}
