use mapgraph_core::MapError;
use mapgraph_text::SerializeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Serialize(SerializeError),
    #[error("unknown format: {0}")]
    UnknownFormat(String),
}

/// Mapping failures raised inside a codec surface as [`Error::Map`].
impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Self {
        match err {
            SerializeError::Map(err) => Error::Map(err),
            err => Error::Serialize(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
