//! Flattening of object graphs into [`Mapped`] and their reconstruction.
//!
//! Flattening walks the graph depth first, in member declaration order. Each
//! object gets a unique name the first time it is reached; reaching it again
//! only yields the name, so cycles terminate, and drops the name from the
//! single reference set. Literals are stored as their text, arrays of
//! objects as fields `i0, i1, ...` and structures as one field per member.
//!
//! Reconstruction resolves names through a memo of the objects rebuilt so
//! far, registering each structure before its members are filled in, so
//! objects referring to each other come back as the same instances.

pub mod naming;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use mapgraph_util::names::{NameAllocator, RandomNames};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{MapError, Result};
use crate::literal::{Literal, LiteralRegistry, NULL_LITERAL};
use crate::mapped::{FieldMap, Mapped};
use crate::reflect::{Introspector, ObjectRef, TypeRegistry};
use crate::type_desc::{Descriptor, TypeDesc};
use crate::value::{Array, Value};
use naming::{default_name, unique_object_name};

/// Root name looked up when a mapped graph has no objects.
const UNKNOWN_ROOT: &str = "unknown";

/// Instance descriptor of a value; `None` for null.
pub fn descriptor_of(value: &Value) -> Option<Descriptor> {
    let ty = value.type_desc()?;
    Some(match value {
        Value::Array(array) => Descriptor::array(ty, array.len()),
        _ => Descriptor { ty, length: None },
    })
}

/// Descriptor text of a value, [`Descriptor::NULL_TYPE`] for null.
pub fn type_of(value: &Value) -> String {
    descriptor_of(value).map_or_else(|| Descriptor::NULL_TYPE.to_string(), |d| d.to_string())
}

/// Text of a non-null literal; text equal to [`NULL_LITERAL`] would read
/// back as null and is rejected.
fn literal_text(literal: &dyn Literal, value: &Value, owner: &str) -> Result<String> {
    let text = literal.to_text(value)?;
    if text == NULL_LITERAL && !value.is_null() {
        return Err(MapError::InvalidArgument(format!(
            "{owner} holds the null text {NULL_LITERAL} as a value"
        )));
    }
    Ok(text)
}

/// How values of one type are flattened.
#[derive(Clone)]
enum Shape {
    Literal(Arc<dyn Literal>),
    /// Array of non-literal elements.
    ReferenceArray,
    Object,
}

struct ShapeCache {
    generation: u64,
    shapes: HashMap<TypeDesc, Shape>,
}

type SharedIntrospector = Arc<dyn Introspector + Send + Sync>;

struct Flattening {
    mapped: Mapped,
    /// Names of visited objects by identity; the handle keeps the identity
    /// valid for the whole walk.
    visited: HashMap<usize, (String, ObjectRef)>,
}

struct Rebuilding<'a> {
    mapped: &'a Mapped,
    built: HashMap<String, Value>,
    /// Arrays whose items are being rebuilt.
    pending: HashSet<String>,
}

/// Converts object graphs to and from [`Mapped`].
///
/// A mapper holds no per-call state and can be shared between threads.
pub struct Mapper {
    literals: Arc<LiteralRegistry>,
    types: SharedIntrospector,
    names: Arc<dyn NameAllocator>,
    shapes: RwLock<ShapeCache>,
}

impl Mapper {
    /// Mapper over `types` using the global literal registry.
    pub fn new(types: TypeRegistry) -> Self {
        Self::builder().introspector(types).build()
    }

    pub fn builder() -> MapperBuilder {
        MapperBuilder::default()
    }

    pub fn literals(&self) -> &Arc<LiteralRegistry> {
        &self.literals
    }

    pub fn introspector(&self) -> &(dyn Introspector + Send + Sync) {
        &*self.types
    }

    pub fn name_allocator(&self) -> &Arc<dyn NameAllocator> {
        &self.names
    }

    pub fn is_literal(&self, ty: &TypeDesc) -> bool {
        self.literals.is_literal(ty, &*self.types)
    }

    /// Flattens the graph reachable from `root`. Null maps to an empty
    /// [`Mapped`].
    pub fn to_map(&self, root: &Value) -> Result<Mapped> {
        let mut state = Flattening {
            mapped: Mapped::new(),
            visited: HashMap::new(),
        };
        if !root.is_null() {
            self.flatten(root, &mut state)?;
        }
        debug!(
            objects = state.mapped.len(),
            single_ref = state.mapped.single_ref_objects.len(),
            "flattened object graph"
        );
        Ok(state.mapped)
    }

    /// Rebuilds the graph rooted at the first object of `mapped`.
    pub fn from_map(&self, mapped: &Mapped) -> Result<Value> {
        self.from_map_named(None, mapped)
    }

    /// Rebuilds the graph rooted at the object named `root`, or at the first
    /// object when `root` is `None`. A root which is not in `mapped` yields
    /// null.
    pub fn from_map_named(&self, root: Option<&str>, mapped: &Mapped) -> Result<Value> {
        let root = root.or_else(|| mapped.root_name()).unwrap_or(UNKNOWN_ROOT);
        let mut state = Rebuilding {
            mapped,
            built: HashMap::new(),
            pending: HashSet::new(),
        };
        let value = self.rebuild(root, &mut state)?;
        debug!(root, rebuilt = state.built.len(), "rebuilt object graph");
        Ok(value)
    }

    fn shape(&self, ty: &TypeDesc) -> Result<Shape> {
        let generation = self.literals.generation();
        {
            let cache = self.shapes.read();
            if cache.generation == generation {
                if let Some(shape) = cache.shapes.get(ty) {
                    return Ok(shape.clone());
                }
            }
        }

        let shape = if self.literals.is_literal(ty, &*self.types) {
            Shape::Literal(self.literals.literal_for(ty, &*self.types)?)
        } else if ty.is_array() {
            Shape::ReferenceArray
        } else {
            Shape::Object
        };

        let mut cache = self.shapes.write();
        if cache.generation != generation {
            cache.shapes.clear();
            cache.generation = generation;
        }
        cache.shapes.insert(ty.clone(), shape.clone());
        Ok(shape)
    }

    fn flatten(&self, value: &Value, state: &mut Flattening) -> Result<String> {
        if let Value::Object(object) = value {
            if let Some((name, _)) = state.visited.get(&object.id()) {
                state.mapped.single_ref_objects.remove(name);
                return Ok(name.clone());
            }
        }

        let descriptor = descriptor_of(value)
            .ok_or_else(|| MapError::InvalidArgument("null cannot be named".to_string()))?;
        let ty = descriptor.ty.clone();
        let potential = default_name(&ty);
        let name = unique_object_name(&potential, &state.mapped.objects, &*self.names);
        if let Value::Object(object) = value {
            state
                .visited
                .insert(object.id(), (name.clone(), object.clone()));
        }
        trace!(name = %name, ty = %descriptor, "flattening");
        state.mapped.types.insert(name.clone(), descriptor.to_string());
        state.mapped.single_ref_objects.insert(name.clone());
        // Reserves the name and the object's position before its members.
        state.mapped.objects.insert(name.clone(), FieldMap::new());

        let fields = match (self.shape(&ty)?, value) {
            (Shape::Literal(literal), _) => {
                let mut fields = FieldMap::with_capacity(1);
                fields.insert(potential, Some(literal_text(&*literal, value, &name)?));
                fields
            }
            (Shape::ReferenceArray, Value::Array(array)) => self.flatten_items(array, state)?,
            (Shape::Object, Value::Object(object)) => self.flatten_fields(object, &ty, state)?,
            _ => return Err(MapError::NotFound(ty.to_string())),
        };
        state.mapped.objects.insert(name.clone(), fields);
        Ok(name)
    }

    fn flatten_items(&self, array: &Array, state: &mut Flattening) -> Result<FieldMap> {
        let mut fields = FieldMap::with_capacity(array.len());
        for (i, item) in array.items.iter().enumerate() {
            let text = if item.is_null() {
                None
            } else {
                Some(self.flatten(item, state)?)
            };
            fields.insert(format!("i{i}"), text);
        }
        Ok(fields)
    }

    fn flatten_fields(
        &self,
        object: &ObjectRef,
        ty: &TypeDesc,
        state: &mut Flattening,
    ) -> Result<FieldMap> {
        let structure = self
            .types
            .structure(ty.leaf())
            .ok_or_else(|| MapError::NotFound(ty.to_string()))?;

        // Read every member before descending: the walk may come back to
        // this object.
        let values = {
            let borrowed = object.borrow();
            structure
                .fields
                .iter()
                .map(|field| {
                    borrowed.field(&field.name).ok_or_else(|| MapError::UnknownField {
                        type_name: structure.name.clone(),
                        field: field.name.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?
        };

        let mut fields = FieldMap::with_capacity(values.len());
        for (field, value) in structure.fields.iter().zip(values) {
            let text = if value.is_null() {
                None
            } else {
                match self.shape(&field.ty)? {
                    Shape::Literal(literal) => Some(literal_text(&*literal, &value, &field.name)?),
                    _ => Some(self.flatten(&value, state)?),
                }
            };
            fields.insert(field.name.clone(), text);
        }
        Ok(fields)
    }

    fn rebuild(&self, name: &str, state: &mut Rebuilding<'_>) -> Result<Value> {
        if let Some(value) = state.built.get(name) {
            return Ok(value.clone());
        }
        let mapped = state.mapped;
        let Some(fields) = mapped.object(name) else {
            return Ok(Value::Null);
        };
        let descriptor: Descriptor = mapped
            .type_of(name)
            .ok_or_else(|| MapError::Malformed(format!("object {name} has no type")))?
            .parse()?;
        trace!(name, ty = %descriptor, "rebuilding");

        let value = match self.shape(&descriptor.ty)? {
            Shape::Literal(literal) => {
                let text = fields
                    .values()
                    .next()
                    .ok_or_else(|| MapError::Malformed(format!("literal {name} has no value")))?;
                match text {
                    Some(text) => literal.to_value(text)?,
                    None => Value::Null,
                }
            }
            Shape::ReferenceArray => self.rebuild_items(name, &descriptor, fields, state)?,
            Shape::Object => return self.rebuild_object(name, &descriptor.ty, fields, state),
        };
        state.built.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn rebuild_items(
        &self,
        name: &str,
        descriptor: &Descriptor,
        fields: &FieldMap,
        state: &mut Rebuilding<'_>,
    ) -> Result<Value> {
        if !state.pending.insert(name.to_string()) {
            return Err(MapError::Malformed(format!("array {name} contains itself")));
        }
        let element = descriptor
            .ty
            .element()
            .cloned()
            .ok_or_else(|| MapError::Malformed(format!("{name} is not an array")))?;
        let length = descriptor.length.unwrap_or(fields.len());
        if length != fields.len() {
            return Err(MapError::Malformed(format!(
                "array {name} declares {length} items but has {} fields",
                fields.len()
            )));
        }
        let mut items = Vec::with_capacity(length);
        for i in 0..length {
            let item = match fields.get(&format!("i{i}")) {
                Some(Some(text)) => self.rebuild(text, state)?,
                Some(None) => Value::Null,
                None => {
                    return Err(MapError::Malformed(format!("array {name} has no item i{i}")))
                }
            };
            items.push(item);
        }
        state.pending.remove(name);
        Ok(Value::Array(Array::new(element, items)))
    }

    fn rebuild_object(
        &self,
        name: &str,
        ty: &TypeDesc,
        fields: &FieldMap,
        state: &mut Rebuilding<'_>,
    ) -> Result<Value> {
        let structure = self
            .types
            .structure(ty.leaf())
            .ok_or_else(|| MapError::NotFound(ty.to_string()))?;
        let object = self.types.allocate(ty.leaf())?;
        state
            .built
            .insert(name.to_string(), Value::Object(object.clone()));

        for (field_name, text) in fields {
            let Some(field) = structure.field_info(field_name) else {
                trace!(name, field = %field_name, "skipping unknown field");
                continue;
            };
            let value = match text {
                None => Value::Null,
                Some(text) => match self.shape(&field.ty)? {
                    Shape::Literal(literal) => literal.to_value(text)?,
                    _ => self.rebuild(text, state)?,
                },
            };
            object.set_field(field_name, value)?;
        }
        Ok(Value::Object(object))
    }
}

/// Configures the collaborators of a [`Mapper`].
#[derive(Default)]
pub struct MapperBuilder {
    literals: Option<Arc<LiteralRegistry>>,
    types: Option<SharedIntrospector>,
    names: Option<Arc<dyn NameAllocator>>,
}

impl MapperBuilder {
    /// Literal registry to use instead of the global one.
    pub fn literals(mut self, literals: Arc<LiteralRegistry>) -> Self {
        self.literals = Some(literals);
        self
    }

    pub fn introspector<I>(self, types: I) -> Self
    where
        I: Introspector + Send + Sync + 'static,
    {
        self.shared_introspector(Arc::new(types))
    }

    pub fn shared_introspector(mut self, types: SharedIntrospector) -> Self {
        self.types = Some(types);
        self
    }

    /// Name allocator, [`RandomNames`] by default.
    pub fn name_allocator<N: NameAllocator + 'static>(mut self, names: N) -> Self {
        self.names = Some(Arc::new(names));
        self
    }

    pub fn build(self) -> Mapper {
        let literals = self.literals.unwrap_or_else(LiteralRegistry::global);
        let generation = literals.generation();
        Mapper {
            literals,
            types: self
                .types
                .unwrap_or_else(|| Arc::new(TypeRegistry::new())),
            names: self.names.unwrap_or_else(|| Arc::new(RandomNames::new())),
            shapes: RwLock::new(ShapeCache {
                generation,
                shapes: HashMap::new(),
            }),
        }
    }
}
