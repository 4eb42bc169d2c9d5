use restmap_wire::WireError;
use thiserror::Error;

/// Errors surfaced by a mapping session.
///
/// [`MapperError::FieldNotFound`] is the only error owned by this crate's
/// read logic; everything else is either a typed-conversion failure at a
/// specific key or a wire-layer error passed through unchanged.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("unexpected type for field \"{key}\": expected {expected}")]
    UnexpectedType {
        key: String,
        expected: &'static str,
    },

    #[error("invalid timestamp for field \"{key}\": {value}")]
    InvalidTimestamp { key: String, value: String },

    #[error("expected a JSON array for a to-many relation")]
    ExpectedArray,

    #[error(transparent)]
    Wire(#[from] WireError),
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::Wire(WireError::Json(err))
    }
}
