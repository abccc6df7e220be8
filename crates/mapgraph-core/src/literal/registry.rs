use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{trace, warn};

use super::{ArrayLiteral, CharLiteral, DateLiteral, EnumLiteral, Literal, ScalarLiteral};
use crate::error::{MapError, Result};
use crate::reflect::Introspector;
use crate::type_desc::TypeDesc;
use crate::value::{names, Value};

type Codecs = HashMap<TypeDesc, Arc<dyn Literal>>;

static GLOBAL: Lazy<Arc<LiteralRegistry>> = Lazy::new(|| Arc::new(LiteralRegistry::new()));

/// Maps types to their literal codecs.
///
/// Built-in codecs are fixed at construction. Codecs for enumerations and
/// arrays of literals are synthesized on first lookup and cached; custom
/// codecs can be registered for any other type.
pub struct LiteralRegistry {
    base: Codecs,
    custom: RwLock<Codecs>,
    synthesized: RwLock<Codecs>,
    generation: AtomicU64,
}

macro_rules! scalar_codec {
    ($codecs:ident, $name:expr, $variant:ident, $ty:ty) => {
        $codecs.insert(
            TypeDesc::scalar($name),
            Arc::new(ScalarLiteral::<$ty>::new($name, Value::$variant, |v| match v {
                Value::$variant(x) => Some(x),
                _ => None,
            })) as Arc<dyn Literal>,
        );
    };
}

fn base_codecs() -> Codecs {
    let mut codecs = Codecs::new();
    scalar_codec!(codecs, names::BOOL, Bool, bool);
    scalar_codec!(codecs, names::I8, I8, i8);
    scalar_codec!(codecs, names::I16, I16, i16);
    scalar_codec!(codecs, names::I32, I32, i32);
    scalar_codec!(codecs, names::I64, I64, i64);
    scalar_codec!(codecs, names::I128, I128, i128);
    scalar_codec!(codecs, names::ISIZE, Isize, isize);
    scalar_codec!(codecs, names::U8, U8, u8);
    scalar_codec!(codecs, names::U16, U16, u16);
    scalar_codec!(codecs, names::U32, U32, u32);
    scalar_codec!(codecs, names::U64, U64, u64);
    scalar_codec!(codecs, names::U128, U128, u128);
    scalar_codec!(codecs, names::USIZE, Usize, usize);
    scalar_codec!(codecs, names::F32, F32, f32);
    scalar_codec!(codecs, names::F64, F64, f64);
    scalar_codec!(codecs, names::STRING, String, String);
    scalar_codec!(codecs, names::BIG_INT, BigInt, num_bigint::BigInt);
    scalar_codec!(codecs, names::DECIMAL, Decimal, rust_decimal::Decimal);
    codecs.insert(TypeDesc::scalar(names::CHAR), Arc::new(CharLiteral));
    codecs.insert(TypeDesc::scalar(names::DATE_TIME), Arc::new(DateLiteral));
    codecs
}

impl Default for LiteralRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LiteralRegistry {
    /// A registry holding only the built-in codecs.
    pub fn new() -> Self {
        Self {
            base: base_codecs(),
            custom: RwLock::new(Codecs::new()),
            synthesized: RwLock::new(Codecs::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// The process-wide registry.
    pub fn global() -> Arc<LiteralRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Counter bumped by every change to the custom codecs.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Whether `ty` is one of the built-in literal types.
    pub fn is_base(&self, ty: &TypeDesc) -> bool {
        self.base.contains_key(ty)
    }

    pub fn is_literal(&self, ty: &TypeDesc, types: &dyn Introspector) -> bool {
        if self.custom.read().contains_key(ty) {
            return true;
        }
        let leaf = TypeDesc::scalar(ty.leaf());
        self.base.contains_key(&leaf)
            || self.custom.read().contains_key(&leaf)
            || types.enumeration(ty.leaf()).is_some()
    }

    /// Codec for `ty`, synthesizing and caching it for enumerations and
    /// arrays of literals.
    pub fn literal_for(&self, ty: &TypeDesc, types: &dyn Introspector) -> Result<Arc<dyn Literal>> {
        if let Some(literal) = self.base.get(ty) {
            return Ok(Arc::clone(literal));
        }
        if let Some(literal) = self.custom.read().get(ty) {
            return Ok(Arc::clone(literal));
        }
        if let Some(literal) = self.synthesized.read().get(ty) {
            return Ok(Arc::clone(literal));
        }

        let generation = self.generation();
        let literal = self.synthesize(ty, types)?;
        let mut synthesized = self.synthesized.write();
        if self.generation() != generation {
            // The custom codecs changed meanwhile; do not cache a stale codec.
            return Ok(literal);
        }
        Ok(Arc::clone(synthesized.entry(ty.clone()).or_insert(literal)))
    }

    fn synthesize(&self, ty: &TypeDesc, types: &dyn Introspector) -> Result<Arc<dyn Literal>> {
        match ty {
            TypeDesc::Array(element) => {
                let element_literal = self.literal_for(element, types)?;
                trace!(ty = %ty, "synthesized array literal");
                Ok(Arc::new(ArrayLiteral::new((**element).clone(), element_literal)))
            }
            TypeDesc::Scalar(name) => match types.enumeration(name) {
                Some(enumeration) => {
                    trace!(ty = %ty, "synthesized enum literal");
                    Ok(Arc::new(EnumLiteral::new(enumeration.clone())))
                }
                None => Err(MapError::NotFound(format!("no literal for type {ty}"))),
            },
        }
    }

    fn check_replaceable(&self, ty: &TypeDesc) -> Result<()> {
        if self.is_base(&TypeDesc::scalar(ty.leaf())) {
            return Err(MapError::InvalidArgument(format!(
                "the literal for built-in type {ty} cannot be replaced"
            )));
        }
        Ok(())
    }

    /// Registers a custom codec for a type which is not a built-in literal.
    pub fn register(&self, ty: TypeDesc, literal: Arc<dyn Literal>) -> Result<()> {
        self.check_replaceable(&ty)?;
        let leaf = ty.leaf().to_string();
        if self.custom.write().insert(ty.clone(), literal).is_some() {
            warn!(ty = %ty, "replaced custom literal");
        }
        self.evict(&leaf);
        Ok(())
    }

    /// Removes a custom codec, returning it if there was one.
    pub fn unregister(&self, ty: &TypeDesc) -> Result<Option<Arc<dyn Literal>>> {
        self.check_replaceable(ty)?;
        let removed = self.custom.write().remove(ty);
        self.evict(ty.leaf());
        Ok(removed)
    }

    fn evict(&self, leaf: &str) {
        self.synthesized.write().retain(|ty, _| ty.leaf() != leaf);
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}
