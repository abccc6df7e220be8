//! XML codec.
//!
//! One child of the root element per top-level object, carrying its type in
//! a `type` attribute. Fields are child elements holding the value text, or
//! `\N` for null; an inlined object is a field element with a `type`.

use std::sync::Arc;

use mapgraph_core::{Mapped, NULL_LITERAL};
use mapgraph_util::{NameAllocator, RandomNames};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{Result, SerializeError};
use crate::options::{format_builder_methods, FormatOptions, XmlOptions};
use crate::reader::MappedBuilder;
use crate::serializer::Serializer;
use crate::writer::{write_mapped, FormatHooks, Layout};

/// Attribute holding the type of an object element.
pub const TYPE_ATTRIBUTE: &str = "type";

pub struct XmlSerializer {
    options: XmlOptions,
    names: Arc<dyn NameAllocator>,
}

impl XmlSerializer {
    pub fn builder() -> XmlSerializerBuilder {
        XmlSerializerBuilder::default()
    }

    pub fn root_element(&self) -> &str {
        &self.options.root_element
    }
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self {
            options: XmlOptions::default(),
            names: Arc::new(RandomNames::new()),
        }
    }
}

pub struct XmlSerializerBuilder {
    options: FormatOptions,
    root_element: String,
    names: Option<Arc<dyn NameAllocator>>,
}

impl Default for XmlSerializerBuilder {
    fn default() -> Self {
        let XmlOptions { format, root_element } = XmlOptions::default();
        Self {
            options: format,
            root_element,
            names: None,
        }
    }
}

impl XmlSerializerBuilder {
    format_builder_methods!();

    pub fn root_element(mut self, name: impl Into<String>) -> Self {
        self.root_element = name.into();
        self
    }

    pub fn options(mut self, options: XmlOptions) -> Self {
        self.options = options.format;
        self.root_element = options.root_element;
        self
    }

    pub fn build(self) -> Result<XmlSerializer> {
        let options = XmlOptions {
            format: self.options,
            root_element: self.root_element,
        };
        options.validate()?;
        Ok(XmlSerializer {
            options,
            names: self.names.unwrap_or_else(|| Arc::new(RandomNames::new())),
        })
    }
}

impl Serializer for XmlSerializer {
    fn options(&self) -> &FormatOptions {
        &self.options.format
    }

    fn read(&self, text: &str) -> Result<Mapped> {
        let (tokens, top_level) = tokenize(text)?;
        let mut builder = MappedBuilder::new(self.names.as_ref());
        for name in &top_level {
            builder.reserve(name);
        }
        let mut tokens = Tokens {
            tokens: tokens.into_iter(),
        };
        match tokens.next_markup()? {
            Some(Token::Open { empty: true, .. }) => {}
            Some(Token::Open { empty: false, .. }) => loop {
                match tokens.next_markup()? {
                    Some(Token::Open { name, ty, empty }) => {
                        let ty = ty.ok_or_else(|| {
                            SerializeError::malformed(format!("object {name} has no {TYPE_ATTRIBUTE}"))
                        })?;
                        builder.begin_object(&name, &ty)?;
                        if !empty {
                            read_children(&mut tokens, &mut builder, &name)?;
                        }
                    }
                    Some(Token::Close) => break,
                    _ => return Err(SerializeError::malformed("unterminated root element")),
                }
            },
            _ => return Err(SerializeError::malformed("no root element")),
        }
        if tokens.next_markup()?.is_some() {
            return Err(SerializeError::malformed("content after the root element"));
        }
        let mapped = builder.finish();
        debug!(objects = mapped.len(), "read xml graph");
        Ok(mapped)
    }

    fn to_text_inlined(&self, mapped: &Mapped, inline: bool) -> Result<String> {
        let hooks = XmlHooks {
            root: &self.options.root_element,
            encoding: &self.options.format.encoding,
        };
        let text = write_mapped(&hooks, &self.options.format, inline, mapped)?;
        debug!(objects = mapped.len(), inline, "wrote xml graph");
        Ok(text)
    }
}

enum Token {
    Open {
        name: String,
        ty: Option<String>,
        empty: bool,
    },
    Text(String),
    Close,
}

/// Element and text events of `text`, adjacent text and CDATA merged, with
/// the names of the root's children.
fn tokenize(text: &str) -> Result<(Vec<Token>, Vec<String>)> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);
    let mut tokens = Vec::new();
    let mut top_level = Vec::new();
    let mut depth = 0usize;
    loop {
        let token = match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                open(&e, false)?
            }
            Event::Empty(e) => open(&e, true)?,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                Token::Close
            }
            Event::Text(e) => Token::Text(e.unescape()?.into_owned()),
            Event::CData(e) => Token::Text(String::from_utf8_lossy(&e.into_inner()).into_owned()),
            Event::Eof => break,
            _ => continue,
        };
        if let Token::Open { name, empty, .. } = &token {
            let open_depth = if *empty { depth + 1 } else { depth };
            if open_depth == 2 {
                top_level.push(name.clone());
            }
        }
        match token {
            Token::Text(more) => match tokens.last_mut() {
                Some(Token::Text(previous)) => previous.push_str(&more),
                _ => tokens.push(Token::Text(more)),
            },
            token => tokens.push(token),
        }
    }
    Ok((tokens, top_level))
}

fn open(e: &BytesStart<'_>, empty: bool) -> Result<Token> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut ty = None;
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == TYPE_ATTRIBUTE.as_bytes() {
            ty = Some(attr.unescape_value()?.into_owned());
        }
    }
    Ok(Token::Open { name, ty, empty })
}

struct Tokens {
    tokens: std::vec::IntoIter<Token>,
}

impl Tokens {
    fn next_raw(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    /// Next element boundary; text between elements must be whitespace.
    fn next_markup(&mut self) -> Result<Option<Token>> {
        while let Some(token) = self.next_raw() {
            match token {
                Token::Text(text) if text.trim().is_empty() => continue,
                Token::Text(text) => {
                    return Err(SerializeError::malformed(format!("unexpected text {text:?}")));
                }
                token => return Ok(Some(token)),
            }
        }
        Ok(None)
    }
}

fn read_children(tokens: &mut Tokens, builder: &mut MappedBuilder<'_>, owner: &str) -> Result<()> {
    loop {
        match tokens.next_markup()? {
            Some(Token::Close) => return Ok(()),
            Some(Token::Open { name, ty: Some(ty), empty }) => {
                let nested = builder.begin_nested(owner, &name, &ty)?;
                if !empty {
                    read_children(tokens, builder, &nested)?;
                }
            }
            Some(Token::Open { name, ty: None, empty: true }) => {
                builder.field(owner, &name, Some(String::new()))?;
            }
            Some(Token::Open { name, ty: None, empty: false }) => {
                let text = match tokens.next_raw() {
                    Some(Token::Close) => String::new(),
                    Some(Token::Text(text)) => match tokens.next_raw() {
                        Some(Token::Close) => text,
                        _ => return Err(SerializeError::malformed(format!("field {name} has child elements"))),
                    },
                    _ => return Err(SerializeError::malformed(format!("field {name} has child elements"))),
                };
                let text = (text != NULL_LITERAL).then_some(text);
                builder.field(owner, &name, text)?;
            }
            Some(Token::Text(_)) | None => {
                return Err(SerializeError::malformed(format!("unterminated object {owner}")));
            }
        }
    }
}

struct XmlHooks<'a> {
    root: &'a str,
    encoding: &'a str,
}

impl FormatHooks for XmlHooks<'_> {
    fn header(&self, out: &mut String, layout: &Layout<'_>) {
        out.push_str(&format!("<?xml version='1.0' encoding='{}'?>", escape(self.encoding)));
        out.push_str(layout.newline);
        out.push_str(&format!("<{}>", self.root));
        out.push_str(layout.newline);
    }

    fn footer(&self, out: &mut String, _layout: &Layout<'_>) {
        out.push_str(&format!("</{}>", self.root));
    }

    fn object_start(&self, out: &mut String, layout: &Layout<'_>, name: &str, ty: &str, _first: bool) {
        typed_open(out, layout, name, ty, 1);
    }

    fn object_end(&self, out: &mut String, layout: &Layout<'_>, name: &str) {
        close(out, layout, name, 1);
    }

    fn nested_start(&self, out: &mut String, layout: &Layout<'_>, field: &str, ty: &str, level: usize) {
        typed_open(out, layout, field, ty, level + 1);
    }

    fn nested_end(&self, out: &mut String, layout: &Layout<'_>, field: &str, level: usize) {
        close(out, layout, field, level + 1);
    }

    fn field(&self, out: &mut String, layout: &Layout<'_>, field: &str, text: Option<&str>, level: usize) {
        out.push_str(&layout.at(level + 1));
        out.push_str(&format!("<{field}>"));
        match text {
            Some(text) if text.contains(['<', '>', '&']) => {
                out.push_str("<![CDATA[");
                out.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
                out.push_str("]]>");
            }
            Some(text) => out.push_str(text),
            None => out.push_str(NULL_LITERAL),
        }
        out.push_str(&format!("</{field}>"));
        out.push_str(layout.newline);
    }
}

fn typed_open(out: &mut String, layout: &Layout<'_>, name: &str, ty: &str, depth: usize) {
    out.push_str(&layout.at(depth));
    out.push_str(&format!("<{name} {TYPE_ATTRIBUTE}='{}'>", escape(ty)));
    out.push_str(layout.newline);
}

fn close(out: &mut String, layout: &Layout<'_>, name: &str, depth: usize) {
    out.push_str(&layout.at(depth));
    out.push_str(&format!("</{name}>"));
    out.push_str(layout.newline);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapgraph_core::FieldMap;
    use mapgraph_util::SequentialNames;

    fn serializer() -> XmlSerializer {
        XmlSerializer::builder()
            .name_allocator(SequentialNames::default())
            .build()
            .unwrap()
    }

    fn sample() -> Mapped {
        let mut mapped = Mapped::new();
        let mut b = FieldMap::new();
        b.insert("c".into(), Some("obj_ref_c".into()));
        b.insert("d".into(), None);
        b.insert("t".into(), Some("a < b && c ]]> d".into()));
        mapped.objects.insert("obj_ref_b".into(), b);
        mapped.types.insert("obj_ref_b".into(), "B".into());
        let mut c = FieldMap::new();
        c.insert("e".into(), Some("  spaced  ".into()));
        c.insert("f".into(), Some(String::new()));
        mapped.objects.insert("obj_ref_c".into(), c);
        mapped.types.insert("obj_ref_c".into(), "String[]".into());
        mapped.single_ref_objects.extend(["obj_ref_b".to_string(), "obj_ref_c".to_string()]);
        mapped
    }

    #[test]
    fn test_layout() {
        let text = serializer().to_text(&sample()).unwrap();
        assert_eq!(
            text,
            concat!(
                "<?xml version='1.0' encoding='UTF-8'?>\n",
                "<root>\n",
                "  <obj_ref_b type='B'>\n",
                "    <c type='String[]'>\n",
                "      <e>  spaced  </e>\n",
                "      <f></f>\n",
                "    </c>\n",
                "    <d>\\N</d>\n",
                "    <t><![CDATA[a < b && c ]]]]><![CDATA[> d]]></t>\n",
                "  </obj_ref_b>\n",
                "</root>"
            )
        );
    }

    #[test]
    fn test_round_trip_inlined_and_flat() {
        let mapped = sample();
        let s = serializer();
        assert_eq!(s.read(&s.to_text(&mapped).unwrap()).unwrap(), mapped);
        let flat = s.to_text_inlined(&mapped, false).unwrap();
        assert!(flat.contains("<c>obj_ref_c</c>"));
        assert_eq!(s.read(&flat).unwrap(), mapped);
    }

    #[test]
    fn test_custom_root_and_entities() {
        let s = XmlSerializer::builder().root_element("graph").build().unwrap();
        let mapped = s
            .read("<graph><obj_ref_a type='A'><x>1 &amp; 2</x><y/></obj_ref_a></graph>")
            .unwrap();
        assert_eq!(mapped.objects["obj_ref_a"]["x"].as_deref(), Some("1 & 2"));
        assert_eq!(mapped.objects["obj_ref_a"]["y"].as_deref(), Some(""));
        assert!(s.to_text(&mapped).unwrap().ends_with("</graph>"));
    }

    #[test]
    fn test_empty_root() {
        assert!(serializer().read("<root/>").unwrap().is_empty());
        let text = serializer().to_text(&Mapped::new()).unwrap();
        assert!(serializer().read(&text).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        let s = serializer();
        for text in [
            "",
            "<root><obj_ref_a><x>1</x></obj_ref_a></root>",
            "<root><obj_ref_a type='A'><x>1<y/></x></obj_ref_a></root>",
            "<root>text<obj_ref_a type='A'/></root>",
            "<root><obj_ref_a type='A'/></root><extra/>",
        ] {
            assert!(matches!(s.read(text), Err(SerializeError::Malformed(_))), "{text:?}");
        }
    }

    #[test]
    fn test_invalid_root_element_fails_at_build() {
        assert!(matches!(
            XmlSerializer::builder().root_element("not valid").build(),
            Err(SerializeError::Config(_))
        ));
    }
}
