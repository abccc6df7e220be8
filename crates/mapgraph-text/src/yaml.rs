//! YAML codec.
//!
//! ```text
//! obj_ref_a:
//!   class: "A"
//!   a: "Test"
//!   b: "10"
//! ```

use std::sync::Arc;

use mapgraph_core::Mapped;
use mapgraph_util::{escape_json_string, NameAllocator, RandomNames};
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::debug;

use crate::error::{Result, SerializeError};
use crate::json::CLASS_KEY;
use crate::options::{format_builder_methods, FormatOptions};
use crate::reader::MappedBuilder;
use crate::serializer::Serializer;
use crate::writer::{write_mapped, FormatHooks, Layout};

pub struct YamlSerializer {
    options: FormatOptions,
    names: Arc<dyn NameAllocator>,
}

impl YamlSerializer {
    pub fn builder() -> YamlSerializerBuilder {
        YamlSerializerBuilder::default()
    }
}

impl Default for YamlSerializer {
    fn default() -> Self {
        Self {
            options: FormatOptions::default(),
            names: Arc::new(RandomNames::new()),
        }
    }
}

#[derive(Default)]
pub struct YamlSerializerBuilder {
    options: FormatOptions,
    names: Option<Arc<dyn NameAllocator>>,
}

impl YamlSerializerBuilder {
    format_builder_methods!();

    pub fn options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<YamlSerializer> {
        self.options.validate()?;
        if self.options.indent_spaces == 0 || self.options.line_separator.is_empty() {
            return Err(SerializeError::Config(
                "yaml needs a non-empty indentation and line separator".to_string(),
            ));
        }
        Ok(YamlSerializer {
            options: self.options,
            names: self.names.unwrap_or_else(|| Arc::new(RandomNames::new())),
        })
    }
}

impl Serializer for YamlSerializer {
    fn options(&self) -> &FormatOptions {
        &self.options
    }

    fn read(&self, text: &str) -> Result<Mapped> {
        let objects = match serde_yaml::from_str::<YamlValue>(text)? {
            YamlValue::Null => Mapping::new(),
            YamlValue::Mapping(objects) => objects,
            _ => return Err(SerializeError::malformed("document root is not a mapping")),
        };
        let mut builder = MappedBuilder::new(self.names.as_ref());
        let mut bodies = Vec::with_capacity(objects.len());
        for (name, body) in &objects {
            let name = key_text(name)?;
            builder.reserve(&name);
            bodies.push((name, body));
        }
        for (name, body) in bodies {
            let body = body
                .as_mapping()
                .ok_or_else(|| SerializeError::malformed(format!("{name} is not a mapping")))?;
            builder.begin_object(&name, class_of(&name, body)?)?;
            read_fields(&mut builder, &name, body)?;
        }
        let mapped = builder.finish();
        debug!(objects = mapped.len(), "read yaml graph");
        Ok(mapped)
    }

    fn to_text_inlined(&self, mapped: &Mapped, inline: bool) -> Result<String> {
        let text = write_mapped(&YamlHooks, &self.options, inline, mapped)?;
        debug!(objects = mapped.len(), inline, "wrote yaml graph");
        Ok(text)
    }
}

fn key_text(key: &YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        other => Err(SerializeError::malformed(format!("unsupported key {other:?}"))),
    }
}

fn class_of<'v>(name: &str, body: &'v Mapping) -> Result<&'v str> {
    match body.iter().next() {
        Some((YamlValue::String(key), YamlValue::String(class))) if key == CLASS_KEY => Ok(class),
        _ => Err(SerializeError::malformed(format!(
            "{name} does not start with a \"{CLASS_KEY}\" string"
        ))),
    }
}

fn read_fields(builder: &mut MappedBuilder<'_>, owner: &str, body: &Mapping) -> Result<()> {
    for (field, value) in body.iter().skip(1) {
        let field = key_text(field)?;
        let text = match value {
            YamlValue::Null => None,
            YamlValue::String(s) => Some(s.clone()),
            YamlValue::Number(n) => Some(n.to_string()),
            YamlValue::Bool(b) => Some(b.to_string()),
            YamlValue::Mapping(inner) => {
                let nested = builder.begin_nested(owner, &field, class_of(&field, inner)?)?;
                read_fields(builder, &nested, inner)?;
                continue;
            }
            YamlValue::Sequence(_) | YamlValue::Tagged(_) => {
                return Err(SerializeError::malformed(format!(
                    "field {field} of {owner} is not a scalar"
                )));
            }
        };
        builder.field(owner, &field, text)?;
    }
    Ok(())
}

struct YamlHooks;

impl FormatHooks for YamlHooks {
    fn header(&self, _out: &mut String, _layout: &Layout<'_>) {}

    fn footer(&self, _out: &mut String, _layout: &Layout<'_>) {}

    fn object_start(&self, out: &mut String, layout: &Layout<'_>, name: &str, ty: &str, _first: bool) {
        out.push_str(&format!("{}:", key(name)));
        out.push_str(layout.newline);
        class_line(out, layout, ty, 1);
    }

    fn object_end(&self, _out: &mut String, _layout: &Layout<'_>, _name: &str) {}

    fn nested_start(&self, out: &mut String, layout: &Layout<'_>, field: &str, ty: &str, level: usize) {
        out.push_str(&layout.at(level));
        out.push_str(&format!("{}:", key(field)));
        out.push_str(layout.newline);
        class_line(out, layout, ty, level + 1);
    }

    fn nested_end(&self, _out: &mut String, _layout: &Layout<'_>, _field: &str, _level: usize) {}

    fn field(&self, out: &mut String, layout: &Layout<'_>, field: &str, text: Option<&str>, level: usize) {
        out.push_str(&layout.at(level));
        match text {
            Some(text) => out.push_str(&format!("{}: {}", key(field), quote(text))),
            None => out.push_str(&format!("{}: null", key(field))),
        }
        out.push_str(layout.newline);
    }
}

fn class_line(out: &mut String, layout: &Layout<'_>, ty: &str, depth: usize) {
    out.push_str(&layout.at(depth));
    out.push_str(&format!("{CLASS_KEY}: {}", quote(ty)));
    out.push_str(layout.newline);
}

/// Mapping key, plain when it reads back as the same string.
fn key(name: &str) -> String {
    let plain = name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !["null", "true", "false"]
            .iter()
            .any(|word| name.eq_ignore_ascii_case(word));
    if plain {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Double-quoted scalar. Characters YAML would fold or reject are escaped.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in escape_json_string(text).chars() {
        match ch {
            '\u{7F}'..='\u{9F}' | '\u{2028}' | '\u{2029}' | '\u{FEFF}' | '\u{FFFE}' | '\u{FFFF}' => {
                quoted.push_str(&format!("\\u{:04X}", ch as u32));
            }
            ch => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}
