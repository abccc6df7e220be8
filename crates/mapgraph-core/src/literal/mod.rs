//! Literal types: values whose complete state fits in one string.
//!
//! Every literal codec shares the same null convention: the absent value is
//! the text [`NULL_LITERAL`], whatever the type.

mod array;
mod builtin;
mod registry;

pub use array::{ArrayLiteral, ARRAY_ESCAPE};
pub use builtin::{CharLiteral, DateLiteral, EnumLiteral, ScalarLiteral, DATE_FORMAT};
pub use registry::LiteralRegistry;

use crate::error::Result;
use crate::value::Value;

/// Text standing for the absent value of any literal type.
pub const NULL_LITERAL: &str = "\\N";

/// A bidirectional text codec for one type.
pub trait Literal: Send + Sync {
    /// Text of a non-null value.
    fn format(&self, value: &Value) -> Result<String>;

    /// Value of text which is not [`NULL_LITERAL`].
    fn parse(&self, text: &str) -> Result<Value>;

    fn to_text(&self, value: &Value) -> Result<String> {
        match value {
            Value::Null => Ok(NULL_LITERAL.to_string()),
            value => self.format(value),
        }
    }

    fn to_value(&self, text: &str) -> Result<Value> {
        if text == NULL_LITERAL {
            Ok(Value::Null)
        } else {
            self.parse(text)
        }
    }
}
