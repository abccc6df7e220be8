//! Conversion of mapped documents between codecs, used by the
//! `mapgraph-convert` binary.
//!
//! Conversion works on the [`Mapped`] form and needs no type registrations.

use std::fmt;
use std::str::FromStr;

use mapgraph_core::Mapped;
use mapgraph_text::{
    FormatOptions, JsonSerializer, Serializer, XmlOptions, XmlSerializer, YamlSerializer,
};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
    Yaml,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
        })
    }
}

/// Codec for `format`. XML uses the default root element.
pub fn serializer(format: Format, options: FormatOptions) -> Result<Box<dyn Serializer>> {
    let codec: Box<dyn Serializer> = match format {
        Format::Json => Box::new(JsonSerializer::builder().options(options).build()?),
        Format::Xml => Box::new(
            XmlSerializer::builder()
                .options(XmlOptions {
                    format: options,
                    ..XmlOptions::default()
                })
                .build()?,
        ),
        Format::Yaml => Box::new(YamlSerializer::builder().options(options).build()?),
    };
    Ok(codec)
}

pub fn read(text: &str, format: Format) -> Result<Mapped> {
    Ok(serializer(format, FormatOptions::default())?.read(text)?)
}

/// Re-encodes `text` from one format into another.
pub fn convert(text: &str, from: Format, to: Format, options: FormatOptions) -> Result<String> {
    let mapped = read(text, from)?;
    let out = serializer(to, options)?.to_text(&mapped)?;
    debug!(%from, %to, objects = mapped.len(), "converted document");
    Ok(out)
}
