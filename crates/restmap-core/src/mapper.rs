//! `Mapper` — one JSON (de)serialization pass over a record's attributes.
//!
//! A session is constructed per pass and discarded after [`Mapper::dump`]
//! (or after the last `get`). Construction opens the output object,
//! `dump` closes it; under single-field output neither brace is written.
//! Callers run one `get`/`set` per attribute in declaration order.

use restmap_wire::{Emitter, Parser};

use crate::config::MapperConfig;
use crate::error::MapperError;
use crate::field::{Field, Primary, ScalarValue, TimeField};
use crate::relation::{HasMany, HasOne, Record};

#[derive(Debug)]
pub struct Mapper {
    config: MapperConfig,
    field_filter: Option<String>,
    emitter: Emitter,
    parser: Parser,
}

impl Mapper {
    /// A write-only session: no document is bound, reads fail.
    pub fn new(config: MapperConfig) -> Self {
        let mut emitter = Emitter::new();
        if !config.output_single_field {
            emitter.emit_map_open();
        }
        Self {
            config,
            field_filter: None,
            emitter,
            parser: Parser::new(),
        }
    }

    /// A read session bound to `document`, usable for both reading and
    /// writing. A malformed document fails construction.
    pub fn from_document(document: &str, config: MapperConfig) -> Result<Self, MapperError> {
        let mut mapper = Self::new(config);
        mapper.parser.load(document)?;
        Ok(mapper)
    }

    pub fn config(&self) -> MapperConfig {
        self.config
    }

    /// Replace the policy between passes. Not meant for use mid-session.
    pub fn set_config(&mut self, config: MapperConfig) {
        self.config = config;
    }

    pub fn field_filter(&self) -> Option<&str> {
        self.field_filter.as_deref()
    }

    /// Name the one key allowed to emit under single-field output.
    pub fn set_field_filter(&mut self, key: impl Into<String>) {
        self.field_filter = Some(key.into());
    }

    /// Finish the session and return the serialized output. Consuming
    /// `self` makes the close-exactly-once rule a move-checked fact.
    pub fn dump(mut self) -> String {
        if !self.config.output_single_field {
            self.emitter.emit_map_close();
        }
        self.emitter.dump()
    }

    /// Raw JSON text at `key`. Absence is [`MapperError::FieldNotFound`]
    /// regardless of the ignore-missing policy; this accessor is the
    /// pass-through the relation pairs build on.
    pub fn get_raw(&self, key: &str) -> Result<String, MapperError> {
        self.parser.ensure_loaded()?;
        let node = self
            .parser
            .find(key)
            .ok_or_else(|| MapperError::FieldNotFound(key.to_string()))?;
        Ok(serde_json::to_string(node)?)
    }

    /// Emit `key` with pre-serialized JSON text, subject to the field
    /// filter.
    pub fn set_raw(&mut self, key: &str, json: &str) {
        if self.filtered_out(key) {
            return;
        }
        if !self.config.output_single_field {
            self.emitter.emit_key(key);
        }
        self.emitter.emit_json(json);
    }

    /// Populate a scalar attribute from the document.
    pub fn get_field<T: ScalarValue>(
        &self,
        key: &str,
        attr: &mut Field<T>,
    ) -> Result<(), MapperError> {
        self.parser.ensure_loaded()?;
        if let Some(node) = self.parser.find(key) {
            if node.is_null() {
                attr.clear(true);
            } else {
                let value = T::from_node(node).ok_or_else(|| MapperError::UnexpectedType {
                    key: key.to_string(),
                    expected: T::EXPECTED,
                })?;
                attr.set(value, true);
            }
        } else if !self.config.ignore_missing_fields {
            return Err(MapperError::FieldNotFound(key.to_string()));
        }
        if self.config.touch_fields {
            attr.touch();
        }
        Ok(())
    }

    /// Emit a scalar attribute into the output.
    pub fn set_field<T: ScalarValue>(&mut self, key: &str, attr: &Field<T>) {
        if self.filtered_out(key) {
            return;
        }
        if !self.config.ignore_dirty_flag && !attr.is_dirty() {
            return;
        }
        if !self.config.output_single_field {
            self.emitter.emit_key(key);
        }
        match attr.get() {
            None => self.emitter.emit_null(),
            Some(value) => value.emit(&mut self.emitter),
        }
        if !self.config.keep_fields_dirty {
            attr.clean();
        }
    }

    /// Populate a temporal attribute. The node's string form goes to the
    /// cell, which parses and normalizes it.
    pub fn get_time(&self, key: &str, attr: &mut TimeField) -> Result<(), MapperError> {
        self.parser.ensure_loaded()?;
        if let Some(node) = self.parser.find(key) {
            if node.is_null() {
                attr.clear(true);
            } else {
                let text = node.as_str().ok_or_else(|| MapperError::UnexpectedType {
                    key: key.to_string(),
                    expected: "string",
                })?;
                attr.set_iso8601(text, true)
                    .map_err(|_| MapperError::InvalidTimestamp {
                        key: key.to_string(),
                        value: text.to_string(),
                    })?;
            }
        } else if !self.config.ignore_missing_fields {
            return Err(MapperError::FieldNotFound(key.to_string()));
        }
        if self.config.touch_fields {
            attr.touch();
        }
        Ok(())
    }

    /// Emit a temporal attribute as an ISO-8601 UTC string.
    pub fn set_time(&mut self, key: &str, attr: &TimeField) {
        if self.filtered_out(key) {
            return;
        }
        if !self.config.ignore_dirty_flag && !attr.is_dirty() {
            return;
        }
        if !self.config.output_single_field {
            self.emitter.emit_key(key);
        }
        match attr.to_iso8601() {
            None => self.emitter.emit_null(),
            Some(text) => self.emitter.emit_str(&text),
        }
        if !self.config.keep_fields_dirty {
            attr.clean();
        }
    }

    /// Populate the primary-key attribute.
    pub fn get_primary(&self, key: &str, attr: &mut Primary) -> Result<(), MapperError> {
        self.parser.ensure_loaded()?;
        if let Some(node) = self.parser.find(key) {
            if node.is_null() {
                attr.clear(true);
            } else {
                let id = node.as_i64().ok_or_else(|| MapperError::UnexpectedType {
                    key: key.to_string(),
                    expected: "integer",
                })?;
                attr.set(id, true);
            }
        } else if !self.config.ignore_missing_fields {
            return Err(MapperError::FieldNotFound(key.to_string()));
        }
        if self.config.touch_fields {
            attr.touch();
        }
        Ok(())
    }

    /// Emit the primary key. Gated on the include-primary-key policy and a
    /// non-null value; the dirty flag plays no part, though it is still
    /// cleared afterward unless keep-fields-dirty.
    pub fn set_primary(&mut self, key: &str, attr: &Primary) {
        if self.filtered_out(key) {
            return;
        }
        if !self.config.include_primary_key {
            return;
        }
        let id = match attr.get() {
            Some(id) => id,
            None => return,
        };
        if !self.config.output_single_field {
            self.emitter.emit_key(key);
        }
        self.emitter.emit_i64(id);
        if !self.config.keep_fields_dirty {
            attr.clean();
        }
    }

    /// Populate a to-one relation. An absent, null, or empty value leaves
    /// the relation untouched; otherwise the nested object recurses into a
    /// child session with the primary key includable.
    pub fn get_has_one<T: Record>(
        &self,
        key: &str,
        attr: &mut HasOne<T>,
    ) -> Result<(), MapperError> {
        self.parser.ensure_loaded()?;
        if self.parser.empty(key) {
            return Ok(());
        }
        let json = self.get_raw(key)?;
        attr.from_json(&json, self.config.for_nested_read())
    }

    /// Emit a to-one relation through a child session with the primary key
    /// forced on and single-field output forced off.
    pub fn set_has_one<T: Record>(
        &mut self,
        key: &str,
        attr: &HasOne<T>,
    ) -> Result<(), MapperError> {
        if self.filtered_out(key) {
            return Ok(());
        }
        if !self.config.ignore_dirty_flag && !attr.is_dirty() {
            return Ok(());
        }
        let json = attr.to_json(self.config.for_nested_write())?;
        self.set_raw(key, &json);
        if !self.config.keep_fields_dirty {
            attr.clean();
        }
        Ok(())
    }

    /// Populate a to-many relation from a JSON array. Same skip rule and
    /// flag derivation as [`get_has_one`](Self::get_has_one).
    pub fn get_has_many<T: Record>(
        &self,
        key: &str,
        attr: &mut HasMany<T>,
    ) -> Result<(), MapperError> {
        self.parser.ensure_loaded()?;
        if self.parser.empty(key) {
            return Ok(());
        }
        let json = self.get_raw(key)?;
        attr.from_json(&json, self.config.for_nested_read())
    }

    /// Emit a to-many relation as a JSON array. Same flag derivation as
    /// [`set_has_one`](Self::set_has_one).
    pub fn set_has_many<T: Record>(
        &mut self,
        key: &str,
        attr: &HasMany<T>,
    ) -> Result<(), MapperError> {
        if self.filtered_out(key) {
            return Ok(());
        }
        if !self.config.ignore_dirty_flag && !attr.is_dirty() {
            return Ok(());
        }
        let json = attr.to_json(self.config.for_nested_write())?;
        self.set_raw(key, &json);
        if !self.config.keep_fields_dirty {
            attr.clean();
        }
        Ok(())
    }

    fn filtered_out(&self, key: &str) -> bool {
        self.config.output_single_field && self.field_filter.as_deref() != Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restmap_wire::WireError;

    #[test]
    fn test_write_only_session_rejects_reads() {
        let mapper = Mapper::new(MapperConfig::default());
        let mut attr: Field<i64> = Field::new();
        let err = mapper.get_field("n", &mut attr).unwrap_err();
        assert!(matches!(err, MapperError::Wire(WireError::NotLoaded)));
    }

    #[test]
    fn test_malformed_document_fails_construction() {
        let err = Mapper::from_document("{oops", MapperConfig::default()).unwrap_err();
        assert!(matches!(err, MapperError::Wire(WireError::Json(_))));
    }

    #[test]
    fn test_primary_and_dirty_title_scenario() {
        let config = MapperConfig {
            include_primary_key: true,
            ..Default::default()
        };
        let mut mapper = Mapper::new(config);

        let mut id = Primary::new();
        id.set(5, false); // clean
        let mut title: Field<String> = Field::new();
        title.set("Hi".to_string(), true); // dirty

        mapper.set_primary("id", &id);
        mapper.set_field("title", &title);
        assert_eq!(mapper.dump(), r#"{"id":5,"title":"Hi"}"#);
    }

    #[test]
    fn test_raw_get_ignores_missing_policy() {
        let config = MapperConfig {
            ignore_missing_fields: true,
            ..Default::default()
        };
        let mapper = Mapper::from_document(r#"{"a":[1,2]}"#, config).unwrap();
        assert_eq!(mapper.get_raw("a").unwrap(), "[1,2]");
        let err = mapper.get_raw("b").unwrap_err();
        assert!(matches!(err, MapperError::FieldNotFound(key) if key == "b"));
    }

    #[test]
    fn test_set_raw_respects_field_filter() {
        let config = MapperConfig {
            output_single_field: true,
            ..Default::default()
        };
        let mut mapper = Mapper::new(config);
        mapper.set_field_filter("wanted");
        mapper.set_raw("other", "1");
        mapper.set_raw("wanted", r#"{"x":2}"#);
        assert_eq!(mapper.dump(), r#"{"x":2}"#);
    }

    #[test]
    fn test_unexpected_type_is_an_error() {
        let mapper = Mapper::from_document(r#"{"n":"seven"}"#, MapperConfig::default()).unwrap();
        let mut attr: Field<i64> = Field::new();
        let err = mapper.get_field("n", &mut attr).unwrap_err();
        assert!(matches!(
            err,
            MapperError::UnexpectedType { expected: "integer", .. }
        ));
        assert!(attr.is_null());
    }
}
