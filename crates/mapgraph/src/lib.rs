//! mapgraph - text serialization of cyclic object graphs.
//!
//! A [`Mapper`] flattens an object graph into a [`Mapped`] and rebuilds it
//! with every shared reference and cycle intact; a [`Serializer`] turns the
//! `Mapped` into JSON, XML or YAML. [`GraphText`] joins the two.
//!
//! ```
//! use mapgraph::{reflect_struct, GraphText, JsonSerializer, Mapper, ObjectRef, TypeRegistry, Value};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     friend: Option<ObjectRef>,
//! }
//! reflect_struct!("demo.Person", Person { name: String, friend: Option<ObjectRef> });
//!
//! let mut types = TypeRegistry::new();
//! types.register::<Person>();
//! let text = GraphText::new(Mapper::new(types), JsonSerializer::default());
//!
//! let ann = ObjectRef::new(Person { name: "Ann".into(), friend: None });
//! let bob = ObjectRef::new(Person { name: "Bob".into(), friend: Some(ann.clone()) });
//! ann.get_mut::<Person>().unwrap().friend = Some(bob.clone());
//!
//! let json = text.to_text(&Value::Object(ann)).unwrap();
//! let ann = text.from_text(&json).unwrap();
//! let ann = ann.as_object().unwrap();
//! let bob = ann.get::<Person>().unwrap().friend.clone().unwrap();
//! assert_eq!(bob.get::<Person>().unwrap().name, "Bob");
//! assert!(bob.get::<Person>().unwrap().friend.as_ref().unwrap().ptr_eq(ann));
//! ```

use std::io;

pub mod cli;
mod error;

pub use error::{Error, Result};
pub use mapgraph_core as core;
pub use mapgraph_core::reflect::{Enumeration, Structure};
pub use mapgraph_core::{
    reflect_enum, reflect_struct, Array, Descriptor, EnumValue, FieldMap, Introspector, Literal,
    LiteralRegistry, MapError, Mapped, Mapper, MapperBuilder, ObjectRef, Reflect, TypeDesc,
    TypeRegistry, Value, NULL_LITERAL, OBJ_NAME_PREFIX,
};
pub use mapgraph_text as text;
pub use mapgraph_text::{
    FormatOptions, JsonSerializer, SerializeError, Serializer, XmlOptions, XmlSerializer,
    YamlSerializer,
};
pub use mapgraph_util::{NameAllocator, RandomNames, SequentialNames};

/// Object graphs to text and back through one codec.
pub struct GraphText<S> {
    mapper: Mapper,
    serializer: S,
}

impl<S: Serializer> GraphText<S> {
    pub fn new(mapper: Mapper, serializer: S) -> Self {
        Self { mapper, serializer }
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    pub fn to_text(&self, root: &Value) -> Result<String> {
        Ok(self.serializer.to_text(&self.mapper.to_map(root)?)?)
    }

    /// Like [`to_text`](Self::to_text), choosing whether single-referenced
    /// objects are written inline.
    pub fn to_text_inlined(&self, root: &Value, inline: bool) -> Result<String> {
        Ok(self
            .serializer
            .to_text_inlined(&self.mapper.to_map(root)?, inline)?)
    }

    pub fn from_text(&self, text: &str) -> Result<Value> {
        Ok(self.mapper.from_map(&self.serializer.read(text)?)?)
    }

    pub fn write(&self, root: &Value, out: &mut dyn io::Write) -> Result<()> {
        self.serializer.write(&self.mapper.to_map(root)?, out)?;
        Ok(())
    }

    pub fn read_from(&self, input: &mut dyn io::Read) -> Result<Value> {
        Ok(self.mapper.from_map(&self.serializer.read_from(input)?)?)
    }
}
