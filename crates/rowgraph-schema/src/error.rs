#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML schema {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported document format for {path} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("duplicate type in schema: {name}")]
    DuplicateType { name: String },

    #[error("duplicate field {field} on type {entity_type}")]
    DuplicateField { entity_type: String, field: String },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
