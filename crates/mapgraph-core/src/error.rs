//! Error type for mapping, reconstruction and literal conversion.

use std::error::Error as StdError;

use thiserror::Error;

type Source = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum MapError {
    /// A type descriptor does not resolve to a known type.
    #[error("type not found: {0}")]
    NotFound(String),

    /// Text could not be converted to a value of a literal type.
    #[error("cannot convert '{text}' to {type_name}: {source}")]
    Conversion {
        type_name: String,
        text: String,
        #[source]
        source: Source,
    },

    /// A value of the wrong kind was handed to a literal codec.
    #[error("{type_name} literal cannot format a {found} value")]
    TypeMismatch { type_name: String, found: String },

    /// Misuse of the literal registry, such as replacing a built-in codec.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A raw instance of a resolved type could not be allocated.
    #[error("cannot reconstruct an instance of {type_name}: {reason}")]
    Reconstruction { type_name: String, reason: String },

    /// Structurally invalid mapped data, such as a bad type descriptor.
    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("{type_name} has no field named '{field}'")]
    UnknownField { type_name: String, field: String },

    /// A field setter rejected the value it was given.
    #[error("field {type_name}.{field} expects {expected}, found {found}")]
    FieldType {
        type_name: String,
        field: String,
        expected: String,
        found: String,
    },
}

impl MapError {
    pub fn conversion<E>(type_name: impl Into<String>, text: &str, source: E) -> Self
    where
        E: Into<Source>,
    {
        MapError::Conversion {
            type_name: type_name.into(),
            text: text.to_string(),
            source: source.into(),
        }
    }

    pub fn mismatch(type_name: impl Into<String>, found: impl Into<String>) -> Self {
        MapError::TypeMismatch {
            type_name: type_name.into(),
            found: found.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
