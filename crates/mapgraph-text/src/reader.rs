//! Assembly of a [`Mapped`] from parsed document events.

use std::collections::HashSet;

use mapgraph_core::mapper::naming::unique_object_name;
use mapgraph_core::{FieldMap, Mapped};
use mapgraph_util::NameAllocator;

use crate::error::{Result, SerializeError};

/// Read state shared by the codecs.
///
/// The first top-level object is the root and starts out single-referenced.
/// Every other object becomes single-referenced on its first incoming
/// reference and multi-referenced on the second. Objects written inline are
/// referenced once by construction.
pub struct MappedBuilder<'a> {
    mapped: Mapped,
    multi_ref: HashSet<String>,
    reserved: HashSet<String>,
    names: &'a dyn NameAllocator,
}

impl<'a> MappedBuilder<'a> {
    pub fn new(names: &'a dyn NameAllocator) -> Self {
        Self {
            mapped: Mapped::new(),
            multi_ref: HashSet::new(),
            reserved: HashSet::new(),
            names,
        }
    }

    /// Keeps `name` away from generated nested names. Call it for every
    /// top-level object before reading any of them.
    pub fn reserve(&mut self, name: &str) {
        self.reserved.insert(name.to_string());
    }

    /// Starts a top-level object.
    pub fn begin_object(&mut self, name: &str, ty: &str) -> Result<()> {
        if self.mapped.objects.contains_key(name) {
            return Err(SerializeError::malformed(format!("object {name} is defined twice")));
        }
        if self.mapped.objects.is_empty() {
            self.mapped.single_ref_objects.insert(name.to_string());
        }
        self.define(name.to_string(), ty);
        Ok(())
    }

    /// Starts an object written inside `field` of `owner` and returns the
    /// name given to it.
    pub fn begin_nested(&mut self, owner: &str, field: &str, ty: &str) -> Result<String> {
        let name = unique_object_name(field, &(&self.mapped.objects, &self.reserved), self.names);
        self.fields_of(owner)?.insert(field.to_string(), Some(name.clone()));
        self.mapped.single_ref_objects.insert(name.clone());
        self.define(name.clone(), ty);
        Ok(name)
    }

    /// Records a field of `owner`. `None` is null.
    pub fn field(&mut self, owner: &str, field: &str, text: Option<String>) -> Result<()> {
        if let Some(text) = text.as_deref().filter(|t| Mapped::is_reference(t)) {
            if self.mapped.single_ref_objects.remove(text) {
                self.multi_ref.insert(text.to_string());
            } else if !self.multi_ref.contains(text) {
                self.mapped.single_ref_objects.insert(text.to_string());
            }
        }
        self.fields_of(owner)?.insert(field.to_string(), text);
        Ok(())
    }

    pub fn finish(self) -> Mapped {
        self.mapped
    }

    fn define(&mut self, name: String, ty: &str) {
        self.mapped.types.insert(name.clone(), ty.to_string());
        self.mapped.objects.insert(name, FieldMap::new());
    }

    fn fields_of(&mut self, owner: &str) -> Result<&mut FieldMap> {
        self.mapped
            .objects
            .get_mut(owner)
            .ok_or_else(|| SerializeError::malformed(format!("field outside object {owner}")))
    }
}
