//! Dynamically typed values exchanged between user objects and the mapper.

use chrono::NaiveDateTime;
use num_bigint::BigInt;
use rust_decimal::Decimal;

use crate::reflect::ObjectRef;
use crate::type_desc::TypeDesc;

/// Names of the built-in literal types.
pub mod names {
    pub const BOOL: &str = "bool";
    pub const CHAR: &str = "char";
    pub const I8: &str = "i8";
    pub const I16: &str = "i16";
    pub const I32: &str = "i32";
    pub const I64: &str = "i64";
    pub const I128: &str = "i128";
    pub const ISIZE: &str = "isize";
    pub const U8: &str = "u8";
    pub const U16: &str = "u16";
    pub const U32: &str = "u32";
    pub const U64: &str = "u64";
    pub const U128: &str = "u128";
    pub const USIZE: &str = "usize";
    pub const F32: &str = "f32";
    pub const F64: &str = "f64";
    pub const STRING: &str = "String";
    pub const BIG_INT: &str = "BigInt";
    pub const DECIMAL: &str = "Decimal";
    pub const DATE_TIME: &str = "DateTime";
    /// Declared type of untyped object references; never literal.
    pub const ANY_OBJECT: &str = "dyn Reflect";
}

/// A value of a fieldless enumeration, by variant name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }
}

/// An owned array with its declared element type.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    pub element: TypeDesc,
    pub items: Vec<Value>,
}

impl Array {
    pub fn new(element: TypeDesc, items: Vec<Value>) -> Self {
        Self { element, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Type of the array itself.
    pub fn type_desc(&self) -> TypeDesc {
        TypeDesc::array_of(self.element.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
    BigInt(BigInt),
    Decimal(Decimal),
    Date(NaiveDateTime),
    Enum(EnumValue),
    Array(Array),
    /// Shared object with identity.
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type of the value; `None` for [`Value::Null`].
    pub fn type_desc(&self) -> Option<TypeDesc> {
        let name = match self {
            Value::Null => return None,
            Value::Enum(e) => return Some(TypeDesc::scalar(e.type_name.clone())),
            Value::Array(array) => return Some(array.type_desc()),
            Value::Object(object) => return Some(TypeDesc::scalar(object.type_name())),
            other => other.kind(),
        };
        Some(TypeDesc::scalar(name))
    }

    /// Name of the variant's built-in type, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => names::BOOL,
            Value::Char(_) => names::CHAR,
            Value::I8(_) => names::I8,
            Value::I16(_) => names::I16,
            Value::I32(_) => names::I32,
            Value::I64(_) => names::I64,
            Value::I128(_) => names::I128,
            Value::Isize(_) => names::ISIZE,
            Value::U8(_) => names::U8,
            Value::U16(_) => names::U16,
            Value::U32(_) => names::U32,
            Value::U64(_) => names::U64,
            Value::U128(_) => names::U128,
            Value::Usize(_) => names::USIZE,
            Value::F32(_) => names::F32,
            Value::F64(_) => names::F64,
            Value::String(_) => names::STRING,
            Value::BigInt(_) => names::BIG_INT,
            Value::Decimal(_) => names::DECIMAL,
            Value::Date(_) => names::DATE_TIME,
            Value::Enum(_) => "enum",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl From<Array> for Value {
    fn from(array: Array) -> Self {
        Value::Array(array)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
