//! The flattened form of an object graph.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::error::Result;
use crate::mapper::naming::OBJ_NAME_PREFIX;
use crate::type_desc::Descriptor;

/// Field name to value text; `None` is null.
pub type FieldMap = IndexMap<String, Option<String>>;

/// Objects by name, in first-seen order, with their type descriptors and the
/// names referenced from exactly one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapped {
    pub objects: IndexMap<String, FieldMap>,
    pub types: HashMap<String, String>,
    pub single_ref_objects: HashSet<String>,
}

impl Mapped {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Name of the first object, the root of the graph.
    pub fn root_name(&self) -> Option<&str> {
        self.objects.keys().next().map(String::as_str)
    }

    /// Whether value text names an object rather than holding a literal.
    pub fn is_reference(text: &str) -> bool {
        text.starts_with(OBJ_NAME_PREFIX)
    }

    pub fn object(&self, name: &str) -> Option<&FieldMap> {
        self.objects.get(name)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.types.get(name).map(String::as_str)
    }

    /// Parsed type descriptor of an object.
    pub fn descriptor(&self, name: &str) -> Option<Result<Descriptor>> {
        self.type_of(name).map(str::parse::<Descriptor>)
    }

    pub fn is_single_ref(&self, name: &str) -> bool {
        self.single_ref_objects.contains(name)
    }
}
