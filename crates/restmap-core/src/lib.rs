//! restmap-core — a bidirectional binder between typed attribute cells and
//! a JSON object representation.
//!
//! One [`Mapper`] session serves one (de)serialization pass: construct it
//! empty for writing or from a document for reading, run one `get`/`set`
//! per attribute, and finish with [`Mapper::dump`]. Behavior is governed
//! by the six policy switches of [`MapperConfig`] and each attribute's
//! null/dirty state.
//!
//! # Example
//!
//! ```
//! use restmap_core::{Field, Mapper, MapperConfig, Primary};
//!
//! let config = MapperConfig {
//!     include_primary_key: true,
//!     ..Default::default()
//! };
//!
//! // Read
//! let mapper = Mapper::from_document(r#"{"id":5,"title":"Hi"}"#, config).unwrap();
//! let mut id = Primary::new();
//! let mut title: Field<String> = Field::new();
//! mapper.get_primary("id", &mut id).unwrap();
//! mapper.get_field("title", &mut title).unwrap();
//! assert_eq!(id.get(), Some(5));
//!
//! // Write
//! let mut mapper = Mapper::new(config);
//! mapper.set_primary("id", &id);
//! mapper.set_field("title", &title);
//! assert_eq!(mapper.dump(), r#"{"id":5,"title":"Hi"}"#);
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod mapper;
pub mod relation;

pub use config::MapperConfig;
pub use error::MapperError;
pub use field::{Field, Primary, ScalarValue, TimeField};
pub use mapper::Mapper;
pub use relation::{HasMany, HasOne, Record};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
