//! Array literals: `[e0,e1,...]`.
//!
//! Leaf items are the element codec's text with `[`, `,`, `]` and the escape
//! introducer escaped; a null leaf is the bare null literal. Items of a
//! multi-dimensional array are the nested arrays' own bracketed text,
//! embedded as is. Decoding maps the escaped delimiters of the whole text out
//! of the way first, so bracket depth and item separators can be found in one
//! pass.

use std::sync::Arc;

use mapgraph_util::strings::Escape;
use once_cell::sync::Lazy;

use super::{Literal, NULL_LITERAL};
use crate::error::{MapError, Result};
use crate::type_desc::TypeDesc;
use crate::value::{Array, Value};

/// Escape applied to array leaf items.
pub static ARRAY_ESCAPE: Lazy<Escape> =
    Lazy::new(|| Escape::new("[,]").expect("array delimiters are distinct"));

pub struct ArrayLiteral {
    element: TypeDesc,
    element_literal: Arc<dyn Literal>,
}

impl ArrayLiteral {
    pub fn new(element: TypeDesc, element_literal: Arc<dyn Literal>) -> Self {
        Self {
            element,
            element_literal,
        }
    }

    pub fn element(&self) -> &TypeDesc {
        &self.element
    }

    fn type_name(&self) -> String {
        TypeDesc::array_of(self.element.clone()).to_string()
    }

    fn item_text(&self, item: &Value) -> Result<String> {
        if item.is_null() {
            Ok(NULL_LITERAL.to_string())
        } else if self.element.is_array() {
            self.element_literal.format(item)
        } else {
            Ok(ARRAY_ESCAPE.escape(&self.element_literal.format(item)?))
        }
    }

    /// Decodes one item of mapped text.
    fn item_value(&self, segment: &str) -> Result<Value> {
        if self.element.is_array() {
            self.element_literal.to_value(segment)
        } else if segment == NULL_LITERAL {
            Ok(Value::Null)
        } else {
            self.element_literal.parse(&ARRAY_ESCAPE.demap(segment))
        }
    }
}

impl Literal for ArrayLiteral {
    fn format(&self, value: &Value) -> Result<String> {
        let array = match value {
            Value::Array(array) => array,
            other => return Err(MapError::mismatch(self.type_name(), other.kind())),
        };
        let mut text = String::with_capacity(2 + array.len() * 4);
        text.push('[');
        for (i, item) in array.items.iter().enumerate() {
            if i > 0 {
                text.push(',');
            }
            text.push_str(&self.item_text(item)?);
        }
        text.push(']');
        Ok(text)
    }

    fn parse(&self, text: &str) -> Result<Value> {
        let invalid = |reason: &'static str| MapError::conversion(self.type_name(), text, reason);

        let mapped = ARRAY_ESCAPE.map(text);
        let inner = mapped
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| invalid("array text must be enclosed in brackets"))?;

        let mut items = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        let mut separated = false;
        for (pos, c) in inner.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.checked_sub(1).ok_or_else(|| invalid("unbalanced brackets"))?,
                ',' if depth == 0 => {
                    items.push(self.item_value(&inner[start..pos])?);
                    start = pos + 1;
                    separated = true;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(invalid("unbalanced brackets"));
        }
        let last = &inner[start..];
        if separated || !last.is_empty() {
            items.push(self.item_value(last)?);
        }
        Ok(Value::Array(Array::new(self.element.clone(), items)))
    }
}
