//! JSON codec.
//!
//! ```text
//! {
//!   "obj_ref_a": {
//!     "class": "A",
//!     "a": "Test",
//!     "b": "10"
//!   }
//! }
//! ```

use std::sync::Arc;

use mapgraph_core::Mapped;
use mapgraph_util::{escape_json_string, NameAllocator, RandomNames};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::{Result, SerializeError};
use crate::options::{format_builder_methods, FormatOptions};
use crate::reader::MappedBuilder;
use crate::serializer::Serializer;
use crate::writer::{write_mapped, FormatHooks, Layout};

/// Key holding the type of an object; always the first key.
pub const CLASS_KEY: &str = "class";

pub struct JsonSerializer {
    options: FormatOptions,
    names: Arc<dyn NameAllocator>,
}

impl JsonSerializer {
    pub fn builder() -> JsonSerializerBuilder {
        JsonSerializerBuilder::default()
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self {
            options: FormatOptions::default(),
            names: Arc::new(RandomNames::new()),
        }
    }
}

#[derive(Default)]
pub struct JsonSerializerBuilder {
    options: FormatOptions,
    names: Option<Arc<dyn NameAllocator>>,
}

impl JsonSerializerBuilder {
    format_builder_methods!();

    pub fn options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<JsonSerializer> {
        self.options.validate()?;
        Ok(JsonSerializer {
            options: self.options,
            names: self.names.unwrap_or_else(|| Arc::new(RandomNames::new())),
        })
    }
}

impl Serializer for JsonSerializer {
    fn options(&self) -> &FormatOptions {
        &self.options
    }

    fn read(&self, text: &str) -> Result<Mapped> {
        let JsonValue::Object(objects) = serde_json::from_str::<JsonValue>(text)? else {
            return Err(SerializeError::malformed("document root is not an object"));
        };
        let mut builder = MappedBuilder::new(self.names.as_ref());
        for name in objects.keys() {
            builder.reserve(name);
        }
        for (name, body) in &objects {
            let body = object_body(name, body)?;
            builder.begin_object(name, class_of(name, body)?)?;
            read_fields(&mut builder, name, body)?;
        }
        let mapped = builder.finish();
        debug!(objects = mapped.len(), "read json graph");
        Ok(mapped)
    }

    fn to_text_inlined(&self, mapped: &Mapped, inline: bool) -> Result<String> {
        let text = write_mapped(&JsonHooks, &self.options, inline, mapped)?;
        debug!(objects = mapped.len(), inline, "wrote json graph");
        Ok(text)
    }
}

fn object_body<'v>(name: &str, value: &'v JsonValue) -> Result<&'v Map<String, JsonValue>> {
    value
        .as_object()
        .ok_or_else(|| SerializeError::malformed(format!("{name} is not an object")))
}

fn class_of<'v>(name: &str, body: &'v Map<String, JsonValue>) -> Result<&'v str> {
    match body.iter().next() {
        Some((key, JsonValue::String(class))) if key == CLASS_KEY => Ok(class),
        _ => Err(SerializeError::malformed(format!(
            "{name} does not start with a \"{CLASS_KEY}\" string"
        ))),
    }
}

fn read_fields(builder: &mut MappedBuilder<'_>, owner: &str, body: &Map<String, JsonValue>) -> Result<()> {
    for (field, value) in body.iter().skip(1) {
        let text = match value {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            JsonValue::Bool(b) => Some(b.to_string()),
            JsonValue::Object(inner) => {
                let nested = builder.begin_nested(owner, field, class_of(field, inner)?)?;
                read_fields(builder, &nested, inner)?;
                continue;
            }
            JsonValue::Array(_) => {
                return Err(SerializeError::malformed(format!("field {field} of {owner} is an array")));
            }
        };
        builder.field(owner, field, text)?;
    }
    Ok(())
}

struct JsonHooks;

impl FormatHooks for JsonHooks {
    fn header(&self, out: &mut String, _layout: &Layout<'_>) {
        out.push('{');
    }

    fn footer(&self, out: &mut String, layout: &Layout<'_>) {
        out.push_str(layout.newline);
        out.push('}');
    }

    fn object_start(&self, out: &mut String, layout: &Layout<'_>, name: &str, ty: &str, first: bool) {
        if !first {
            out.push(',');
        }
        out.push_str(layout.newline);
        out.push_str(&layout.at(1));
        out.push_str(&format!("\"{}\": {{", escape_json_string(name)));
        class_line(out, layout, ty, 2);
    }

    fn object_end(&self, out: &mut String, layout: &Layout<'_>, _name: &str) {
        out.push_str(layout.newline);
        out.push_str(&layout.at(1));
        out.push('}');
    }

    fn nested_start(&self, out: &mut String, layout: &Layout<'_>, field: &str, ty: &str, level: usize) {
        out.push(',');
        out.push_str(layout.newline);
        out.push_str(&layout.at(level + 1));
        out.push_str(&format!("\"{}\": {{", escape_json_string(field)));
        class_line(out, layout, ty, level + 2);
    }

    fn nested_end(&self, out: &mut String, layout: &Layout<'_>, _field: &str, level: usize) {
        out.push_str(layout.newline);
        out.push_str(&layout.at(level + 1));
        out.push('}');
    }

    fn field(&self, out: &mut String, layout: &Layout<'_>, field: &str, text: Option<&str>, level: usize) {
        out.push(',');
        out.push_str(layout.newline);
        out.push_str(&layout.at(level + 1));
        out.push_str(&format!("\"{}\": ", escape_json_string(field)));
        match text {
            Some(text) => out.push_str(&format!("\"{}\"", escape_json_string(text))),
            None => out.push_str("null"),
        }
    }
}

fn class_line(out: &mut String, layout: &Layout<'_>, ty: &str, depth: usize) {
    out.push_str(layout.newline);
    out.push_str(&layout.at(depth));
    out.push_str(&format!("\"{CLASS_KEY}\": \"{}\"", escape_json_string(ty)));
}
