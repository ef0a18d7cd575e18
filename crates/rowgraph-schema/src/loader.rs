#![deny(unsafe_code)]

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::SchemaError;

/// Reads a TOML or JSON document, picking the parser from the file extension.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, SchemaError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => {
            let contents = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
            toml::from_str(&contents).map_err(|e| SchemaError::Toml {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Some("json") => {
            let contents = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
            serde_json::from_str(&contents).map_err(|e| SchemaError::Json {
                path: path.to_path_buf(),
                source: e,
            })
        }
        _ => Err(SchemaError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
