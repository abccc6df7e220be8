use std::io;

use mapgraph_core::MapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("xml: {0}")]
    Xml(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Map(#[from] MapError),
}

impl SerializeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

impl From<quick_xml::Error> for SerializeError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SerializeError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SerializeError>;
