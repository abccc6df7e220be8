//! mapgraph-text - JSON, XML and YAML text for flattened object graphs.
//!
//! Every codec writes a [`Mapped`](mapgraph_core::Mapped) through the same
//! algorithm ([`write_mapped`]) and reads documents back through the same
//! builder ([`MappedBuilder`]); only the syntax differs.
//!
//! ```
//! use mapgraph_core::{FieldMap, Mapped};
//! use mapgraph_text::{JsonSerializer, Serializer};
//!
//! let mut mapped = Mapped::new();
//! let mut fields = FieldMap::new();
//! fields.insert("a".into(), Some("Test".into()));
//! mapped.objects.insert("obj_ref_a".into(), fields);
//! mapped.types.insert("obj_ref_a".into(), "A".into());
//! mapped.single_ref_objects.insert("obj_ref_a".into());
//!
//! let json = JsonSerializer::default();
//! let text = json.to_text(&mapped).unwrap();
//! assert_eq!(json.read(&text).unwrap(), mapped);
//! ```

pub mod error;
pub mod json;
pub mod options;
pub mod reader;
pub mod serializer;
pub mod writer;
pub mod xml;
pub mod yaml;

pub use error::{Result, SerializeError};
pub use json::{JsonSerializer, JsonSerializerBuilder};
pub use options::{FormatOptions, XmlOptions};
pub use reader::MappedBuilder;
pub use serializer::Serializer;
pub use writer::{write_mapped, FormatHooks, Layout};
pub use xml::{XmlSerializer, XmlSerializerBuilder};
pub use yaml::{YamlSerializer, YamlSerializerBuilder};
