//! Conversions between Rust field types and [`Value`].

use chrono::NaiveDateTime;
use num_bigint::BigInt;
use rust_decimal::Decimal;

use super::ObjectRef;
use crate::type_desc::TypeDesc;
use crate::value::{names, Array, Value};

/// A type which can be stored in a reflected field.
pub trait FieldType: Sized {
    /// Declared type of the field.
    fn type_desc() -> TypeDesc;

    fn to_value(&self) -> Value;

    /// `None` when `value` is not of this type.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! scalar_field_type {
    ($($ty:ty => $variant:ident, $name:expr;)*) => {
        $(
            impl FieldType for $ty {
                fn type_desc() -> TypeDesc {
                    TypeDesc::scalar($name)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

scalar_field_type! {
    bool => Bool, names::BOOL;
    char => Char, names::CHAR;
    i8 => I8, names::I8;
    i16 => I16, names::I16;
    i32 => I32, names::I32;
    i64 => I64, names::I64;
    i128 => I128, names::I128;
    isize => Isize, names::ISIZE;
    u8 => U8, names::U8;
    u16 => U16, names::U16;
    u32 => U32, names::U32;
    u64 => U64, names::U64;
    u128 => U128, names::U128;
    usize => Usize, names::USIZE;
    f32 => F32, names::F32;
    f64 => F64, names::F64;
    String => String, names::STRING;
    BigInt => BigInt, names::BIG_INT;
    Decimal => Decimal, names::DECIMAL;
    NaiveDateTime => Date, names::DATE_TIME;
}

impl FieldType for ObjectRef {
    fn type_desc() -> TypeDesc {
        TypeDesc::scalar(names::ANY_OBJECT)
    }

    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// Nullable field; shares the declared type of `T`.
impl<T: FieldType> FieldType for Option<T> {
    fn type_desc() -> TypeDesc {
        T::type_desc()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T: FieldType> FieldType for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::array_of(T::type_desc())
    }

    fn to_value(&self) -> Value {
        Value::Array(Array::new(
            T::type_desc(),
            self.iter().map(FieldType::to_value).collect(),
        ))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(array) => array.items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}
