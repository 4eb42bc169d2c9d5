//! `MapperConfig` — the six serialization-policy switches.
//!
//! Six independent booleans govern one mapping session. The packed bit
//! values are kept stable so flag combinations persisted as integers keep
//! their meaning across versions.

/// Bit value of [`MapperConfig::ignore_missing_fields`].
pub const IGNORE_MISSING_FIELDS: u8 = 1;
/// Bit value of [`MapperConfig::include_primary_key`].
pub const INCLUDE_PRIMARY_KEY: u8 = 2;
/// Bit value of [`MapperConfig::ignore_dirty_flag`].
pub const IGNORE_DIRTY_FLAG: u8 = 4;
/// Bit value of [`MapperConfig::touch_fields`].
pub const TOUCH_FIELDS: u8 = 8;
/// Bit value of [`MapperConfig::keep_fields_dirty`].
pub const KEEP_FIELDS_DIRTY: u8 = 16;
/// Bit value of [`MapperConfig::output_single_field`].
pub const OUTPUT_SINGLE_FIELD: u8 = 32;

/// Serialization policy for one mapping session.
///
/// Read-only while the session runs; relation recursion derives child
/// configurations via [`for_nested_read`](Self::for_nested_read) and
/// [`for_nested_write`](Self::for_nested_write).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapperConfig {
    /// Tolerate absent keys on read instead of failing.
    pub ignore_missing_fields: bool,
    /// Permit emission of the primary-key attribute when it is non-null.
    pub include_primary_key: bool,
    /// Emit attributes even when not dirty.
    pub ignore_dirty_flag: bool,
    /// Mark every read attribute dirty after population.
    pub touch_fields: bool,
    /// Suppress the automatic dirty-clear that follows emission.
    pub keep_fields_dirty: bool,
    /// Restrict emission to the field-filter key, without object braces.
    pub output_single_field: bool,
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a packed flag integer (see the bit constants in this module).
    pub fn from_bits(bits: u8) -> Self {
        Self {
            ignore_missing_fields: bits & IGNORE_MISSING_FIELDS != 0,
            include_primary_key: bits & INCLUDE_PRIMARY_KEY != 0,
            ignore_dirty_flag: bits & IGNORE_DIRTY_FLAG != 0,
            touch_fields: bits & TOUCH_FIELDS != 0,
            keep_fields_dirty: bits & KEEP_FIELDS_DIRTY != 0,
            output_single_field: bits & OUTPUT_SINGLE_FIELD != 0,
        }
    }

    /// Encode as a packed flag integer.
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.ignore_missing_fields {
            bits |= IGNORE_MISSING_FIELDS;
        }
        if self.include_primary_key {
            bits |= INCLUDE_PRIMARY_KEY;
        }
        if self.ignore_dirty_flag {
            bits |= IGNORE_DIRTY_FLAG;
        }
        if self.touch_fields {
            bits |= TOUCH_FIELDS;
        }
        if self.keep_fields_dirty {
            bits |= KEEP_FIELDS_DIRTY;
        }
        if self.output_single_field {
            bits |= OUTPUT_SINGLE_FIELD;
        }
        bits
    }

    /// Configuration handed to a child session that parses a nested
    /// relation object: the child always treats its own primary key as
    /// includable.
    pub fn for_nested_read(mut self) -> Self {
        self.include_primary_key = true;
        self
    }

    /// Configuration handed to a child session that serializes a nested
    /// relation object: primary key forced on, single-field restriction
    /// forced off.
    pub fn for_nested_write(mut self) -> Self {
        self.include_primary_key = true;
        self.output_single_field = false;
        self
    }
}
