//! mapgraph-util - string and naming utilities for mapgraph
//!
//! Delimiter escaping used by literal text, JSON string escaping, identifier
//! helpers and unique name allocation.

pub mod error;
pub mod names;
pub mod strings;

pub use error::EscapeError;
pub use names::{NameAllocator, NameSet, RandomNames, SequentialNames};
pub use strings::{escape_json_string, is_valid_xml_name, to_identifier, uncap_first, Escape};
