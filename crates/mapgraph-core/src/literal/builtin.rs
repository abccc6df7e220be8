use std::error::Error as StdError;
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;

use super::Literal;
use crate::error::{MapError, Result};
use crate::reflect::Enumeration;
use crate::value::{names, EnumValue, Value};

/// Text format of [`Value::Date`], to the millisecond.
pub const DATE_FORMAT: &str = "%d-%b-%Y %H:%M:%S%.3f";

/// Codec for any type with matching `FromStr` and `Display`.
pub struct ScalarLiteral<T> {
    name: &'static str,
    wrap: fn(T) -> Value,
    unwrap: fn(&Value) -> Option<&T>,
}

impl<T> ScalarLiteral<T> {
    pub const fn new(
        name: &'static str,
        wrap: fn(T) -> Value,
        unwrap: fn(&Value) -> Option<&T>,
    ) -> Self {
        Self { name, wrap, unwrap }
    }
}

impl<T> Literal for ScalarLiteral<T>
where
    T: FromStr + Display,
    T::Err: StdError + Send + Sync + 'static,
{
    fn format(&self, value: &Value) -> Result<String> {
        (self.unwrap)(value)
            .map(ToString::to_string)
            .ok_or_else(|| MapError::mismatch(self.name, value.kind()))
    }

    fn parse(&self, text: &str) -> Result<Value> {
        text.parse::<T>()
            .map(self.wrap)
            .map_err(|e| MapError::conversion(self.name, text, e))
    }
}

/// A character is the first character of its text.
pub struct CharLiteral;

impl Literal for CharLiteral {
    fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::Char(c) => Ok(c.to_string()),
            other => Err(MapError::mismatch(names::CHAR, other.kind())),
        }
    }

    fn parse(&self, text: &str) -> Result<Value> {
        text.chars()
            .next()
            .map(Value::Char)
            .ok_or_else(|| MapError::conversion(names::CHAR, text, "empty text"))
    }
}

pub struct DateLiteral;

impl Literal for DateLiteral {
    fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::Date(date) => Ok(date.format(DATE_FORMAT).to_string()),
            other => Err(MapError::mismatch(names::DATE_TIME, other.kind())),
        }
    }

    fn parse(&self, text: &str) -> Result<Value> {
        NaiveDateTime::parse_from_str(text, DATE_FORMAT)
            .map(Value::Date)
            .map_err(|e| MapError::conversion(names::DATE_TIME, text, e))
    }
}

/// Codec for a fieldless enumeration: the text is the variant name.
pub struct EnumLiteral {
    enumeration: Enumeration,
}

impl EnumLiteral {
    pub fn new(enumeration: Enumeration) -> Self {
        Self { enumeration }
    }
}

impl Literal for EnumLiteral {
    fn format(&self, value: &Value) -> Result<String> {
        match value {
            Value::Enum(e) if e.type_name == self.enumeration.name => Ok(e.variant.clone()),
            other => Err(MapError::mismatch(
                &self.enumeration.name,
                other
                    .type_desc()
                    .map_or_else(|| other.kind().to_string(), |ty| ty.to_string()),
            )),
        }
    }

    fn parse(&self, text: &str) -> Result<Value> {
        if self.enumeration.has_variant(text) {
            Ok(Value::Enum(EnumValue::new(&self.enumeration.name, text)))
        } else {
            Err(MapError::conversion(
                &self.enumeration.name,
                text,
                "no such variant",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i32_literal() -> ScalarLiteral<i32> {
        ScalarLiteral::new(
            names::I32,
            Value::I32,
            |v| match v {
                Value::I32(n) => Some(n),
                _ => None,
            },
        )
    }

    #[test]
    fn test_scalar_literal() {
        let literal = i32_literal();
        assert_eq!(literal.to_text(&Value::I32(-10)).unwrap(), "-10");
        assert_eq!(literal.to_value("10").unwrap(), Value::I32(10));
        assert_eq!(literal.to_value("\\N").unwrap(), Value::Null);
        assert_eq!(literal.to_text(&Value::Null).unwrap(), "\\N");
    }

    #[test]
    fn test_scalar_literal_errors() {
        let literal = i32_literal();
        assert!(matches!(
            literal.to_value("ten"),
            Err(MapError::Conversion { .. })
        ));
        assert!(matches!(
            literal.to_text(&Value::from("10")),
            Err(MapError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_char_literal() {
        assert_eq!(CharLiteral.to_value("xyz").unwrap(), Value::Char('x'));
        assert_eq!(CharLiteral.to_text(&Value::Char('é')).unwrap(), "é");
        assert!(CharLiteral.to_value("").is_err());
    }

    #[test]
    fn test_date_literal() {
        let date = NaiveDateTime::parse_from_str("2016-03-07 14:05:09.250", "%Y-%m-%d %H:%M:%S%.3f")
            .unwrap();
        let text = DateLiteral.to_text(&Value::Date(date)).unwrap();
        assert_eq!(text, "07-Mar-2016 14:05:09.250");
        assert_eq!(DateLiteral.to_value(&text).unwrap(), Value::Date(date));
        assert!(DateLiteral.to_value("2016-03-07").is_err());
    }

    #[test]
    fn test_enum_literal() {
        let literal = EnumLiteral::new(Enumeration::new("test.F", ["a", "b", "c"]));
        let b = Value::Enum(EnumValue::new("test.F", "b"));
        assert_eq!(literal.to_text(&b).unwrap(), "b");
        assert_eq!(literal.to_value("b").unwrap(), b);
        assert!(literal.to_value("d").is_err());
        let other = Value::Enum(EnumValue::new("test.Other", "b"));
        assert!(literal.to_text(&other).is_err());
    }
}
