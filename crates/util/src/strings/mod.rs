//! String utilities.
//!
//! Delimiter escaping, JSON string escaping and identifier helpers.

mod escape;
mod json;
mod util;

pub use escape::{Escape, DEFAULT_INTRODUCER, PUA_START};
pub use json::escape_json_string;
pub use util::{is_valid_xml_name, to_identifier, uncap_first};
