//! Structure introspection.
//!
//! The mapper never touches user types directly. It enumerates members and
//! reads and writes them through [`Reflect`], learns declared member types
//! from an [`Introspector`], and allocates blank instances through it during
//! reconstruction. [`reflect_struct!`](crate::reflect_struct) and
//! [`reflect_enum!`](crate::reflect_enum) generate the implementations for
//! plain structs and fieldless enums.

mod field;
mod macros;
mod object;
mod registry;

use std::any::Any;

pub use field::FieldType;
pub use object::ObjectRef;
pub use registry::{Enumeration, FieldInfo, Introspector, Structure, TypeRegistry};

use crate::error::Result;
use crate::value::Value;

/// Dynamic access to the members of an object.
pub trait Reflect: Any {
    fn type_name(&self) -> &str;

    /// Current value of a member, `None` if there is no such member.
    fn field(&self, name: &str) -> Option<Value>;

    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A reflected type with a static structure.
pub trait Structured: Reflect + Default {
    const TYPE_NAME: &'static str;

    fn structure() -> Structure;
}

/// A fieldless enum handled by variant name.
pub trait ReflectEnum: Sized {
    const TYPE_NAME: &'static str;

    fn variants() -> &'static [&'static str];

    fn variant_name(&self) -> &'static str;

    fn from_variant(name: &str) -> Option<Self>;

    fn enumeration() -> Enumeration {
        Enumeration::new(Self::TYPE_NAME, Self::variants().iter().copied())
    }
}
