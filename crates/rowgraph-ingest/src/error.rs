use std::path::PathBuf;

use rowgraph_model::{ModelError, ValidationReport};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("mapper configuration '{}' has {} issue(s)", .0.mapper_name, .0.issue_count())]
    InvalidConfiguration(ValidationReport),

    #[error("failed to serialize bundle: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
