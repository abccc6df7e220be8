//! The write algorithm shared by the codecs.

use std::collections::HashSet;

use mapgraph_core::{FieldMap, Mapped};

use crate::error::{Result, SerializeError};
use crate::options::FormatOptions;

/// Indentation unit and line separator of one write.
pub struct Layout<'a> {
    pub indent: String,
    pub newline: &'a str,
}

impl<'a> Layout<'a> {
    pub fn new(options: &'a FormatOptions) -> Self {
        Self {
            indent: options.indent(),
            newline: &options.line_separator,
        }
    }

    /// Indentation for `level` nesting levels.
    pub fn at(&self, level: usize) -> String {
        self.indent.repeat(level)
    }
}

/// Syntax of one format. `level` is the nesting depth of a field: the fields
/// of a top-level object are at level 1, those of an object inlined into them
/// at level 2.
pub trait FormatHooks {
    fn header(&self, out: &mut String, layout: &Layout<'_>);

    fn footer(&self, out: &mut String, layout: &Layout<'_>);

    fn object_start(&self, out: &mut String, layout: &Layout<'_>, name: &str, ty: &str, first: bool);

    fn object_end(&self, out: &mut String, layout: &Layout<'_>, name: &str);

    fn nested_start(&self, out: &mut String, layout: &Layout<'_>, field: &str, ty: &str, level: usize);

    fn nested_end(&self, out: &mut String, layout: &Layout<'_>, field: &str, level: usize);

    /// A field holding literal text, a reference or null (`None`).
    fn field(&self, out: &mut String, layout: &Layout<'_>, field: &str, text: Option<&str>, level: usize);
}

/// Writes `mapped` through `hooks`.
///
/// With `inline` set, an object referenced from exactly one field is written
/// inside that field instead of at the top level. Each object is written
/// once; later references to it stay names.
pub fn write_mapped(
    hooks: &dyn FormatHooks,
    options: &FormatOptions,
    inline: bool,
    mapped: &Mapped,
) -> Result<String> {
    let layout = Layout::new(options);
    let mut writer = Writer {
        hooks,
        layout: &layout,
        mapped,
        inline,
        written: HashSet::new(),
        out: String::new(),
    };
    hooks.header(&mut writer.out, &layout);
    let mut first = true;
    for (name, fields) in &mapped.objects {
        if writer.written.contains(name.as_str()) {
            continue;
        }
        writer.written.insert(name.as_str());
        let ty = writer.type_of(name)?;
        hooks.object_start(&mut writer.out, &layout, name, ty, first);
        writer.fields(fields, 1)?;
        hooks.object_end(&mut writer.out, &layout, name);
        first = false;
    }
    hooks.footer(&mut writer.out, &layout);
    Ok(writer.out)
}

struct Writer<'w> {
    hooks: &'w dyn FormatHooks,
    layout: &'w Layout<'w>,
    mapped: &'w Mapped,
    inline: bool,
    written: HashSet<&'w str>,
    out: String,
}

impl<'w> Writer<'w> {
    fn type_of(&self, name: &str) -> Result<&'w str> {
        self.mapped
            .type_of(name)
            .ok_or_else(|| SerializeError::malformed(format!("object {name} has no type")))
    }

    fn fields(&mut self, fields: &'w FieldMap, level: usize) -> Result<()> {
        for (field, text) in fields {
            match self.inlined(text.as_deref()) {
                Some((name, nested)) => {
                    self.written.insert(name);
                    let ty = self.type_of(name)?;
                    self.hooks.nested_start(&mut self.out, self.layout, field, ty, level);
                    self.fields(nested, level + 1)?;
                    self.hooks.nested_end(&mut self.out, self.layout, field, level);
                }
                None => self
                    .hooks
                    .field(&mut self.out, self.layout, field, text.as_deref(), level),
            }
        }
        Ok(())
    }

    /// The object `text` names, when it is to be written in place.
    fn inlined(&self, text: Option<&'w str>) -> Option<(&'w str, &'w FieldMap)> {
        let name = text.filter(|t| self.inline && Mapped::is_reference(t))?;
        if !self.mapped.is_single_ref(name) || self.written.contains(name) {
            return None;
        }
        self.mapped.objects.get_key_value(name).map(|(k, v)| (k.as_str(), v))
    }
}
