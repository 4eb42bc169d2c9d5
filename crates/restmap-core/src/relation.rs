//! Relation containers and the record seam they recurse through.
//!
//! A relation holds whole records, not leaf values. The binder only needs
//! each record to round-trip itself as JSON under a given configuration
//! and to report/reset its aggregate dirtiness; [`Record`] is that seam.
//! Containers carry no dirty bit of their own.

use serde_json::Value;

use crate::config::MapperConfig;
use crate::error::MapperError;

/// A record type that can be bound through a nested mapping session.
///
/// Implementations typically construct a [`Mapper`](crate::Mapper) inside
/// `from_json`/`to_json` and run one `get`/`set` per attribute.
pub trait Record: Default {
    /// Populate this record from a JSON object text.
    fn from_json(&mut self, json: &str, config: MapperConfig) -> Result<(), MapperError>;

    /// Serialize this record as a JSON object text.
    fn to_json(&self, config: MapperConfig) -> Result<String, MapperError>;

    /// Whether any attribute of this record is dirty.
    fn is_dirty(&self) -> bool;

    /// Clear the dirty flag on every attribute of this record.
    fn clean(&self);
}

/// A to-one relation: at most one nested record.
#[derive(Debug)]
pub struct HasOne<T: Record> {
    item: Option<T>,
}

impl<T: Record> Default for HasOne<T> {
    fn default() -> Self {
        Self { item: None }
    }
}

impl<T: Record> HasOne<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&T> {
        self.item.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.item.as_mut()
    }

    pub fn set(&mut self, item: T) {
        self.item = Some(item);
    }

    pub fn take(&mut self) -> Option<T> {
        self.item.take()
    }

    pub fn is_null(&self) -> bool {
        self.item.is_none()
    }

    pub fn is_dirty(&self) -> bool {
        self.item.as_ref().is_some_and(Record::is_dirty)
    }

    pub fn clean(&self) {
        if let Some(item) = &self.item {
            item.clean();
        }
    }

    /// Populate the nested record (default-constructing it first if the
    /// relation was empty) from a JSON object text.
    pub fn from_json(&mut self, json: &str, config: MapperConfig) -> Result<(), MapperError> {
        let item = self.item.get_or_insert_with(T::default);
        item.from_json(json, config)
    }

    /// Serialize the nested record, or `null` when the relation is empty.
    pub fn to_json(&self, config: MapperConfig) -> Result<String, MapperError> {
        match &self.item {
            Some(item) => item.to_json(config),
            None => Ok("null".to_string()),
        }
    }
}

/// A to-many relation: an ordered collection of nested records, bound as a
/// JSON array.
#[derive(Debug)]
pub struct HasMany<T: Record> {
    items: Vec<T>,
}

impl<T: Record> Default for HasMany<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> HasMany<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_dirty(&self) -> bool {
        self.items.iter().any(Record::is_dirty)
    }

    pub fn clean(&self) {
        for item in &self.items {
            item.clean();
        }
    }

    /// Replace the collection with records parsed from a JSON array text.
    /// Each element goes through [`Record::from_json`] under the same
    /// configuration.
    pub fn from_json(&mut self, json: &str, config: MapperConfig) -> Result<(), MapperError> {
        let parsed: Value = serde_json::from_str(json)?;
        let elements = match parsed {
            Value::Array(elements) => elements,
            _ => return Err(MapperError::ExpectedArray),
        };

        let mut items = Vec::with_capacity(elements.len());
        for element in &elements {
            let mut item = T::default();
            item.from_json(&serde_json::to_string(element)?, config)?;
            items.push(item);
        }
        self.items = items;
        Ok(())
    }

    /// Serialize the collection as a JSON array text.
    pub fn to_json(&self, config: MapperConfig) -> Result<String, MapperError> {
        let parts = self
            .items
            .iter()
            .map(|item| item.to_json(config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("[{}]", parts.join(",")))
    }
}

impl<'a, T: Record> IntoIterator for &'a HasMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    #[derive(Debug, Default)]
    struct Note {
        text: Field<String>,
    }

    impl Record for Note {
        fn from_json(&mut self, json: &str, _config: MapperConfig) -> Result<(), MapperError> {
            let value: Value = serde_json::from_str(json)?;
            match value.get("text").and_then(Value::as_str) {
                Some(text) => self.text.set(text.to_string(), true),
                None => self.text.clear(true),
            }
            Ok(())
        }

        fn to_json(&self, _config: MapperConfig) -> Result<String, MapperError> {
            match self.text.get() {
                Some(text) => Ok(format!("{{\"text\":{}}}", serde_json::to_string(text)?)),
                None => Ok("{\"text\":null}".to_string()),
            }
        }

        fn is_dirty(&self) -> bool {
            self.text.is_dirty()
        }

        fn clean(&self) {
            self.text.clean();
        }
    }

    #[test]
    fn test_has_one_starts_empty_and_clean() {
        let rel: HasOne<Note> = HasOne::new();
        assert!(rel.is_null());
        assert!(!rel.is_dirty());
        assert_eq!(rel.to_json(MapperConfig::default()).unwrap(), "null");
    }

    #[test]
    fn test_has_one_from_json_builds_record() {
        let mut rel: HasOne<Note> = HasOne::new();
        rel.from_json(r#"{"text":"hi"}"#, MapperConfig::default())
            .unwrap();
        assert_eq!(rel.get().unwrap().text.get(), Some(&"hi".to_string()));
        assert!(rel.is_dirty());
        rel.clean();
        assert!(!rel.is_dirty());
    }

    #[test]
    fn test_has_one_dirty_delegates_to_record() {
        let mut rel: HasOne<Note> = HasOne::new();
        rel.set(Note::default());
        assert!(!rel.is_dirty()); // fresh record, clean fields
        rel.get_mut().unwrap().text.set("x".to_string(), true);
        assert!(rel.is_dirty());
    }

    #[test]
    fn test_has_many_rebuilds_from_array() {
        let mut rel: HasMany<Note> = HasMany::new();
        rel.from_json(
            r#"[{"text":"a"},{"text":"b"}]"#,
            MapperConfig::default(),
        )
        .unwrap();
        assert_eq!(rel.len(), 2);
        assert_eq!(rel.get(1).unwrap().text.get(), Some(&"b".to_string()));

        // A second load replaces, not appends
        rel.from_json(r#"[{"text":"c"}]"#, MapperConfig::default())
            .unwrap();
        assert_eq!(rel.len(), 1);
    }

    #[test]
    fn test_has_many_rejects_non_array() {
        let mut rel: HasMany<Note> = HasMany::new();
        let err = rel
            .from_json(r#"{"text":"a"}"#, MapperConfig::default())
            .unwrap_err();
        assert!(matches!(err, MapperError::ExpectedArray));
    }

    #[test]
    fn test_has_many_to_json() {
        let mut rel: HasMany<Note> = HasMany::new();
        let mut a = Note::default();
        a.text.set("a".to_string(), true);
        rel.push(a);
        rel.push(Note::default());
        assert_eq!(
            rel.to_json(MapperConfig::default()).unwrap(),
            r#"[{"text":"a"},{"text":null}]"#
        );
    }

    #[test]
    fn test_has_many_dirty_any_and_clean_all() {
        let mut rel: HasMany<Note> = HasMany::new();
        rel.push(Note::default());
        rel.push(Note::default());
        assert!(!rel.is_dirty());
        rel.get_mut(1).unwrap().text.set("x".to_string(), true);
        assert!(rel.is_dirty());
        rel.clean();
        assert!(!rel.is_dirty());
    }
}
