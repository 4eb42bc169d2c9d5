//! JSON wire collaborators for restmap.
//!
//! Two halves, one per direction:
//!
//! - [`Parser`] binds to a single parsed JSON document and answers key
//!   existence/emptiness queries plus leaf access over its root object.
//! - [`Emitter`] accumulates one JSON value as text, managing comma and
//!   colon separators so callers can interleave keys, literals, and raw
//!   pre-serialized fragments.
//!
//! # Example
//!
//! ```
//! use restmap_wire::{Emitter, Parser};
//!
//! let mut parser = Parser::new();
//! parser.load(r#"{"name":"Bob","age":42}"#).unwrap();
//! assert!(parser.exists("name"));
//! assert_eq!(parser.find("age").and_then(|n| n.as_i64()), Some(42));
//!
//! let mut emitter = Emitter::new();
//! emitter.emit_map_open();
//! emitter.emit_key("name");
//! emitter.emit_str("Bob");
//! emitter.emit_map_close();
//! assert_eq!(emitter.dump(), r#"{"name":"Bob"}"#);
//! ```

use thiserror::Error;

pub mod emitter;
pub mod parser;

pub use emitter::Emitter;
pub use parser::Parser;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("JSON document error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no JSON document bound to this session")]
    NotLoaded,
}
