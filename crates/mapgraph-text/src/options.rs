//! Codec configuration.
//!
//! Options deserialize with defaults for every missing key, so a partial
//! TOML or JSON table is enough:
//!
//! ```
//! use mapgraph_text::FormatOptions;
//!
//! let options: FormatOptions = serde_json::from_str(r#"{"indent_spaces": 4}"#).unwrap();
//! assert_eq!(options.indent_spaces, 4);
//! assert_eq!(options.line_separator, "\n");
//! assert!(options.inline_single_ref_objects);
//! ```

use mapgraph_util::is_valid_xml_name;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SerializeError};

/// Layout shared by every codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub indent_spaces: usize,
    pub line_separator: String,
    /// Label declared in the XML prolog. Output bytes are always UTF-8.
    pub encoding: String,
    /// Write objects referenced from exactly one field inside that field.
    pub inline_single_ref_objects: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_spaces: 2,
            line_separator: "\n".to_string(),
            encoding: "UTF-8".to_string(),
            inline_single_ref_objects: true,
        }
    }
}

impl FormatOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.line_separator.chars().all(char::is_whitespace) {
            return Err(SerializeError::Config(format!(
                "line separator {:?} must be whitespace",
                self.line_separator
            )));
        }
        if !matches!(self.encoding.to_ascii_uppercase().as_str(), "UTF-8" | "UTF8") {
            return Err(SerializeError::Config(format!(
                "unsupported encoding {:?}, only UTF-8 is written",
                self.encoding
            )));
        }
        Ok(())
    }

    pub(crate) fn indent(&self) -> String {
        " ".repeat(self.indent_spaces)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlOptions {
    #[serde(flatten)]
    pub format: FormatOptions,
    pub root_element: String,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            format: FormatOptions::default(),
            root_element: "root".to_string(),
        }
    }
}

impl XmlOptions {
    pub fn validate(&self) -> Result<()> {
        self.format.validate()?;
        if !is_valid_xml_name(&self.root_element) {
            return Err(SerializeError::Config(format!(
                "root element {:?} is not a valid XML name",
                self.root_element
            )));
        }
        Ok(())
    }
}

/// Setters common to every codec builder. The builder needs `options:
/// FormatOptions` and `names: Option<Arc<dyn NameAllocator>>` fields.
macro_rules! format_builder_methods {
    () => {
        pub fn indent_spaces(mut self, spaces: usize) -> Self {
            self.options.indent_spaces = spaces;
            self
        }

        pub fn line_separator(mut self, separator: impl Into<String>) -> Self {
            self.options.line_separator = separator.into();
            self
        }

        pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
            self.options.encoding = encoding.into();
            self
        }

        pub fn inline_single_ref_objects(mut self, inline: bool) -> Self {
            self.options.inline_single_ref_objects = inline;
            self
        }

        /// Allocator for the names of nested objects met while reading.
        pub fn name_allocator<N: mapgraph_util::NameAllocator + 'static>(mut self, names: N) -> Self {
            self.names = Some(std::sync::Arc::new(names));
            self
        }
    };
}

pub(crate) use format_builder_methods;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FormatOptions::default();
        assert_eq!(options.indent(), "  ");
        assert!(options.validate().is_ok());
        assert_eq!(XmlOptions::default().root_element, "root");
    }

    #[test]
    fn test_validation() {
        let bad_separator = FormatOptions {
            line_separator: ";".into(),
            ..FormatOptions::default()
        };
        assert!(matches!(bad_separator.validate(), Err(SerializeError::Config(_))));

        let latin = FormatOptions {
            encoding: "ISO-8859-1".into(),
            ..FormatOptions::default()
        };
        assert!(latin.validate().is_err());
        let lower = FormatOptions {
            encoding: "utf-8".into(),
            ..FormatOptions::default()
        };
        assert!(lower.validate().is_ok());

        let xml = XmlOptions {
            root_element: "1root".into(),
            ..XmlOptions::default()
        };
        assert!(matches!(xml.validate(), Err(SerializeError::Config(_))));
    }

    #[test]
    fn test_xml_options_flatten_format_keys() {
        let options: XmlOptions =
            serde_json::from_str(r#"{"indent_spaces": 1, "root_element": "graph"}"#).unwrap();
        assert_eq!(options.format.indent_spaces, 1);
        assert_eq!(options.format.encoding, "UTF-8");
        assert_eq!(options.root_element, "graph");
    }
}
