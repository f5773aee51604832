//! Error types for level, registry and asset loading

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading level content or talking to the object registry.
///
/// Lookups that are expected to miss at runtime (nothing under the cursor, a
/// ray that hits nothing) never produce one of these; they return a hit
/// result with `hit == false`.
#[derive(Debug, Error)]
pub enum LevelError {
    /// A file could not be read or written
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    /// A required key is absent
    #[error("missing required key `{key}` (expected {expected})")]
    MissingKey { key: String, expected: &'static str },

    /// A key is present but holds the wrong JSON type
    #[error("key `{key}` has the wrong type: expected {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An array key has the wrong number of elements
    #[error("key `{key}` expects {expected} elements, found {found}")]
    WrongArity {
        key: String,
        expected: usize,
        found: usize,
    },

    /// A numeric key is outside the range its field accepts
    #[error("key `{key}` is out of range: {detail}")]
    OutOfRange { key: String, detail: String },

    /// No factory is registered under this identifier
    #[error("unknown object type `{0}`")]
    UnknownType(String),

    /// A factory is already registered under this identifier
    #[error("object type `{0}` is already registered")]
    DuplicateType(String),

    /// The object handed to a serializer is not the type the identifier names
    #[error("object is not of registered type `{0}`")]
    TypeMismatch(String),

    /// Animation identifiers must be non-empty `[A-Za-z0-9_]`
    #[error("invalid animation id `{0}`")]
    InvalidAnimationId(String),

    /// An animation with this identifier already exists
    #[error("animation `{0}` already exists")]
    DuplicateAnimation(String),

    /// Context wrapper naming the level-file entry that failed
    #[error("level object #{index} (`{type_id}`): {source}")]
    Object {
        index: usize,
        type_id: String,
        #[source]
        source: Box<LevelError>,
    },
}

impl LevelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the index and type of the level entry being parsed
    pub(crate) fn in_object(self, index: usize, type_id: &str) -> Self {
        Self::Object {
            index,
            type_id: type_id.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LevelError>;
