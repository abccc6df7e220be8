use std::collections::HashMap;

use super::{ObjectRef, ReflectEnum, Structured};
use crate::error::{MapError, Result};
use crate::type_desc::TypeDesc;

/// A member of a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    /// Declared type; decides whether the member is stored as literal text.
    pub ty: TypeDesc,
}

/// The members of a type, in declaration order, and how to allocate a
/// blank instance of it.
#[derive(Debug, Clone)]
pub struct Structure {
    pub name: String,
    pub fields: Vec<FieldInfo>,
    /// Builds a zero instance without running user construction logic.
    pub allocate: Option<fn() -> ObjectRef>,
}

impl Structure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            allocate: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeDesc) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn with_allocator(mut self, allocate: fn() -> ObjectRef) -> Self {
        self.allocate = Some(allocate);
        self
    }

    pub fn field_info(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A fieldless enumeration, by variant names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub name: String,
    pub variants: Vec<String>,
}

impl Enumeration {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_variant(&self, variant: &str) -> bool {
        self.variants.iter().any(|v| v == variant)
    }
}

/// Type information the mapper needs about user types.
pub trait Introspector {
    fn structure(&self, type_name: &str) -> Option<&Structure>;

    fn enumeration(&self, type_name: &str) -> Option<&Enumeration>;

    /// Allocates a blank instance of a structure.
    fn allocate(&self, type_name: &str) -> Result<ObjectRef> {
        let structure = self
            .structure(type_name)
            .ok_or_else(|| MapError::NotFound(type_name.to_string()))?;
        match structure.allocate {
            Some(allocate) => Ok(allocate()),
            None => Err(MapError::Reconstruction {
                type_name: type_name.to_string(),
                reason: "no allocator registered".to_string(),
            }),
        }
    }
}

/// Explicit per-type registration of structures and enumerations.
///
/// ```
/// use mapgraph_core::reflect::{Introspector, TypeRegistry};
/// use mapgraph_core::reflect_struct;
///
/// #[derive(Debug, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
/// reflect_struct!("geo.Point", Point { x: i32, y: i32 });
///
/// let mut types = TypeRegistry::new();
/// types.register::<Point>();
///
/// let point = types.structure("geo.Point").unwrap();
/// assert_eq!(point.fields.len(), 2);
/// assert!(types.allocate("geo.Point").is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    structures: HashMap<String, Structure>,
    enumerations: HashMap<String, Enumeration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Structured>(&mut self) -> &mut Self {
        self.register_structure(T::structure())
    }

    pub fn register_enum<E: ReflectEnum>(&mut self) -> &mut Self {
        self.register_enumeration(E::enumeration())
    }

    /// Registers a hand-written structure, replacing any previous one of the
    /// same name.
    pub fn register_structure(&mut self, structure: Structure) -> &mut Self {
        self.structures.insert(structure.name.clone(), structure);
        self
    }

    pub fn register_enumeration(&mut self, enumeration: Enumeration) -> &mut Self {
        self.enumerations
            .insert(enumeration.name.clone(), enumeration);
        self
    }

    pub fn len(&self) -> usize {
        self.structures.len() + self.enumerations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Introspector for TypeRegistry {
    fn structure(&self, type_name: &str) -> Option<&Structure> {
        self.structures.get(type_name)
    }

    fn enumeration(&self, type_name: &str) -> Option<&Enumeration> {
        self.enumerations.get(type_name)
    }
}
