use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown column name: {0:?}")]
    UnknownColumn(String),
    #[error("invalid representation id: {0:?}")]
    InvalidRepresentationId(String),
    #[error("field separator must be a single ASCII character, got {0:?}")]
    InvalidSeparator(String),
    #[error("skip line character must be a single ASCII character, got {0:?}")]
    InvalidSkipLineChar(String),
    #[error("invalid mapper configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
