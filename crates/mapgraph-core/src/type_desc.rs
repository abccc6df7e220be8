//! Type descriptors.
//!
//! A [`TypeDesc`] names a declared type: a scalar type name, or an array of
//! some element type. A [`Descriptor`] is what the mapper records for each
//! object instance: the type plus, for arrays, the length of the first
//! dimension, rendered as `name[len][]...[]`.

use std::fmt;
use std::str::FromStr;

use crate::error::MapError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeDesc {
    Scalar(String),
    Array(Box<TypeDesc>),
}

impl TypeDesc {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeDesc::Scalar(name.into())
    }

    pub fn array_of(element: TypeDesc) -> Self {
        TypeDesc::Array(Box::new(element))
    }

    /// `leaf` nested in `dimensions` arrays.
    pub fn with_dimensions(leaf: impl Into<String>, dimensions: usize) -> Self {
        (0..dimensions).fold(TypeDesc::Scalar(leaf.into()), |ty, _| {
            TypeDesc::array_of(ty)
        })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDesc::Array(_))
    }

    /// Element type of an array.
    pub fn element(&self) -> Option<&TypeDesc> {
        match self {
            TypeDesc::Array(element) => Some(element),
            TypeDesc::Scalar(_) => None,
        }
    }

    /// Innermost scalar type name; the name itself for scalars.
    pub fn leaf(&self) -> &str {
        match self {
            TypeDesc::Scalar(name) => name,
            TypeDesc::Array(element) => element.leaf(),
        }
    }

    /// Number of array dimensions; zero for scalars.
    pub fn dimensions(&self) -> usize {
        match self {
            TypeDesc::Scalar(_) => 0,
            TypeDesc::Array(element) => 1 + element.dimensions(),
        }
    }

    /// Leaf name without its module path (`geo.Point` and `geo::Point` are
    /// both `Point`).
    pub fn simple_name(&self) -> &str {
        let leaf = self.leaf();
        let after_path = leaf.rsplit("::").next().unwrap_or(leaf);
        after_path.rsplit('.').next().unwrap_or(after_path)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.leaf())?;
        for _ in 0..self.dimensions() {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl FromStr for TypeDesc {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Descriptor>().map(|d| d.ty)
    }
}

/// Instance descriptor: the type of one mapped object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Descriptor {
    pub ty: TypeDesc,
    /// Length of the first dimension, for arrays.
    pub length: Option<usize>,
}

impl Descriptor {
    /// Descriptor of the absent value.
    pub const NULL_TYPE: &'static str = "NullType";

    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            ty: TypeDesc::scalar(name),
            length: None,
        }
    }

    pub fn array(ty: TypeDesc, length: usize) -> Self {
        Self {
            ty,
            length: Some(length),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ty.leaf())?;
        let dimensions = self.ty.dimensions();
        if dimensions > 0 {
            match self.length {
                Some(length) => write!(f, "[{length}]")?,
                None => f.write_str("[]")?,
            }
            for _ in 1..dimensions {
                f.write_str("[]")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Descriptor {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MapError::Malformed(format!("invalid type descriptor '{s}'"));
        let (leaf, mut rest) = match s.find('[') {
            Some(pos) => (&s[..pos], &s[pos..]),
            None => (s, ""),
        };
        if leaf.is_empty() || leaf.contains(']') {
            return Err(malformed());
        }

        let mut dimensions = 0;
        let mut length = None;
        while !rest.is_empty() {
            if !rest.starts_with('[') {
                return Err(malformed());
            }
            let close = rest.find(']').ok_or_else(malformed)?;
            let inside = &rest[1..close];
            if inside.contains('[') {
                return Err(malformed());
            }
            if !inside.is_empty() {
                if dimensions > 0 {
                    return Err(malformed());
                }
                length = Some(inside.parse::<usize>().map_err(|_| malformed())?);
            }
            dimensions += 1;
            rest = &rest[close + 1..];
        }

        Ok(Self {
            ty: TypeDesc::with_dimensions(leaf, dimensions),
            length,
        })
    }
}
