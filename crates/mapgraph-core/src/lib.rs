//! Flattening of cyclic object graphs into a text-friendly intermediate form
//! and their reconstruction with object identity preserved.
//!
//! ```
//! use mapgraph_core::reflect::{ObjectRef, TypeRegistry};
//! use mapgraph_core::{reflect_struct, Mapper, Value};
//!
//! #[derive(Debug, Default)]
//! struct C {
//!     c: Option<ObjectRef>,
//! }
//! reflect_struct!("test.C", C { c: Option<ObjectRef> });
//!
//! let mut types = TypeRegistry::new();
//! types.register::<C>();
//! let mapper = Mapper::new(types);
//!
//! let c = ObjectRef::new(C::default());
//! c.get_mut::<C>().unwrap().c = Some(c.clone());
//!
//! let mapped = mapper.to_map(&Value::Object(c)).unwrap();
//! assert_eq!(mapped.len(), 1);
//!
//! let rebuilt = mapper.from_map(&mapped).unwrap();
//! let rebuilt = rebuilt.as_object().unwrap();
//! let inner = rebuilt.get::<C>().unwrap().c.clone().unwrap();
//! assert!(inner.ptr_eq(rebuilt));
//! ```

pub mod error;
pub mod literal;
pub mod mapped;
pub mod mapper;
pub mod reflect;
pub mod type_desc;
pub mod value;

pub use error::{MapError, Result};
pub use literal::{Literal, LiteralRegistry, NULL_LITERAL};
pub use mapped::{FieldMap, Mapped};
pub use mapper::naming::OBJ_NAME_PREFIX;
pub use mapper::{type_of, Mapper, MapperBuilder};
pub use reflect::{Introspector, ObjectRef, Reflect, TypeRegistry};
pub use type_desc::{Descriptor, TypeDesc};
pub use value::{Array, EnumValue, Value};
