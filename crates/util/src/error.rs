//! Error types for the string utilities.

use thiserror::Error;

/// Invalid [`Escape`](crate::strings::Escape) configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscapeError {
    #[error("no characters were provided for escaping")]
    Empty,
    #[error("character '{0}' has been specified more than once for escaping")]
    Duplicate(char),
    #[error("{0} escapable characters do not fit in the private use area")]
    TooMany(usize),
}
