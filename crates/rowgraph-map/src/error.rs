//! Error types for mapping operations.

use rowgraph_model::ModelError;
use rowgraph_schema::LookupError;

/// Hard failure of one representation for one record.
///
/// These abort the representation they occur in, never the record or the batch.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("unknown attribute schema for {entity_type}: {key}")]
    UnknownAttribute { entity_type: String, key: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}
