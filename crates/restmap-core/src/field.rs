//! Attribute cells: typed value storage with null and dirty tracking.
//!
//! A cell's dirty flag must be mutable from the serialization path, which
//! only holds a shared reference. The flag therefore lives in a `Cell`,
//! and `clean`/`touch` are the only mutators reachable through `&self`;
//! changing the value itself (`set`, `clear`) requires `&mut self`.

use std::cell::Cell;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use restmap_wire::Emitter;
use serde_json::Value;

/// A typed attribute cell. Null is represented by an absent value.
#[derive(Debug)]
pub struct Field<T> {
    value: Option<T>,
    dirty: Cell<bool>,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self {
            value: None,
            dirty: Cell::new(false),
        }
    }
}

impl<T> Field<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Clear the dirty flag.
    pub fn clean(&self) {
        self.dirty.set(false);
    }

    /// Set the dirty flag.
    pub fn touch(&self) {
        self.dirty.set(true);
    }

    /// Drop the value, making the cell null.
    pub fn clear(&mut self, mark_dirty: bool) {
        self.value = None;
        if mark_dirty {
            self.touch();
        }
    }

    /// Store a value.
    pub fn set(&mut self, value: T, mark_dirty: bool) {
        self.value = Some(value);
        if mark_dirty {
            self.touch();
        }
    }
}

/// The closed set of plain scalar value kinds a [`Field`] can bind.
pub trait ScalarValue: Sized {
    /// Type name used in conversion error messages.
    const EXPECTED: &'static str;

    /// Extract a value of this kind from a JSON leaf node.
    fn from_node(node: &Value) -> Option<Self>;

    /// Emit this value as a JSON literal.
    fn emit(&self, out: &mut Emitter);
}

impl ScalarValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_node(node: &Value) -> Option<Self> {
        node.as_i64()
    }

    fn emit(&self, out: &mut Emitter) {
        out.emit_i64(*self);
    }
}

impl ScalarValue for f64 {
    const EXPECTED: &'static str = "number";

    fn from_node(node: &Value) -> Option<Self> {
        node.as_f64()
    }

    fn emit(&self, out: &mut Emitter) {
        out.emit_f64(*self);
    }
}

impl ScalarValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_node(node: &Value) -> Option<Self> {
        node.as_bool()
    }

    fn emit(&self, out: &mut Emitter) {
        out.emit_bool(*self);
    }
}

impl ScalarValue for String {
    const EXPECTED: &'static str = "string";

    fn from_node(node: &Value) -> Option<Self> {
        node.as_str().map(ToOwned::to_owned)
    }

    fn emit(&self, out: &mut Emitter) {
        out.emit_str(self);
    }
}

/// A temporal attribute cell. Bound as text on the wire, stored as UTC.
pub type TimeField = Field<DateTime<Utc>>;

impl Field<DateTime<Utc>> {
    /// Store a timestamp from its textual form: RFC 3339, or a naive
    /// `%Y-%m-%dT%H:%M:%S` interpreted as UTC.
    pub fn set_iso8601(&mut self, text: &str, mark_dirty: bool) -> Result<(), chrono::ParseError> {
        let parsed = DateTime::parse_from_rfc3339(text)
            .map(|t| t.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").map(|n| n.and_utc())
            })?;
        self.set(parsed, mark_dirty);
        Ok(())
    }

    /// ISO-8601 text with an explicit `Z` designator, or `None` when null.
    pub fn to_iso8601(&self) -> Option<String> {
        self.get()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// The record identifier attribute. Same cell contract as [`Field`], but a
/// distinct type: its emission is gated by policy and presence, never by
/// the dirty flag.
#[derive(Debug, Default)]
pub struct Primary {
    field: Field<i64>,
}

impl Primary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<i64> {
        self.field.get().copied()
    }

    pub fn is_null(&self) -> bool {
        self.field.is_null()
    }

    pub fn is_dirty(&self) -> bool {
        self.field.is_dirty()
    }

    pub fn clean(&self) {
        self.field.clean();
    }

    pub fn touch(&self) {
        self.field.touch();
    }

    pub fn clear(&mut self, mark_dirty: bool) {
        self.field.clear(mark_dirty);
    }

    pub fn set(&mut self, id: i64, mark_dirty: bool) {
        self.field.set(id, mark_dirty);
    }
}
