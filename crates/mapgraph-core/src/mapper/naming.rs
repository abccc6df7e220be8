//! Object names: `obj_ref_` followed by a lower-camel identifier derived from
//! the object's type, made unique with a suffix.

use mapgraph_util::names::{NameAllocator, NameSet};
use mapgraph_util::strings::{to_identifier, uncap_first};

use crate::type_desc::TypeDesc;

/// Prefix of every object name.
pub const OBJ_NAME_PREFIX: &str = "obj_ref_";

/// `proposed` with the object name prefix added if missing.
pub fn object_name(proposed: &str) -> String {
    if proposed.starts_with(OBJ_NAME_PREFIX) {
        proposed.to_string()
    } else {
        format!("{OBJ_NAME_PREFIX}{proposed}")
    }
}

/// Prefixed name built from `proposed` which is not in `taken`.
pub fn unique_object_name(proposed: &str, taken: &dyn NameSet, allocator: &dyn NameAllocator) -> String {
    object_name(&allocator.unique_name(&object_name(proposed), taken))
}

/// Name proposed for objects of type `ty`, without the prefix; arrays use
/// their leaf type.
pub fn default_name(ty: &TypeDesc) -> String {
    uncap_first(&to_identifier(ty.simple_name()))
}
