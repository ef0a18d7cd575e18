//! Test invocation of a mapper configuration on the head of a file.

use serde::Serialize;
use tracing::debug;

use rowgraph_map::RecordMapper;
use rowgraph_model::MapperConfig;
use rowgraph_schema::{DefaultValueProvider, IdentityLookup};

use crate::batch::Bundle;
use crate::error::IngestError;
use crate::reader::read_records;

/// Only this many lines of the content are read by a preview.
pub const PREVIEW_LINE_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewReport {
    /// Pretty-printed bundle JSON.
    pub objects: String,
    pub nb_entities: usize,
    pub nb_relationships: usize,
}

/// Parses and validates `configuration_json`, then maps the first lines of `content`.
///
/// An invalid configuration is returned as [`IngestError::InvalidConfiguration`]
/// carrying every issue, and nothing is mapped.
pub async fn preview<P, L>(
    mapper: &RecordMapper<'_, P, L>,
    configuration_json: &str,
    content: &str,
) -> Result<PreviewReport, IngestError>
where
    P: DefaultValueProvider,
    L: IdentityLookup,
{
    let config = MapperConfig::from_json(configuration_json)?;
    preview_config(mapper, &config, content).await
}

pub async fn preview_config<P, L>(
    mapper: &RecordMapper<'_, P, L>,
    config: &MapperConfig,
    content: &str,
) -> Result<PreviewReport, IngestError>
where
    P: DefaultValueProvider,
    L: IdentityLookup,
{
    let report = rowgraph_validate::validate(config, mapper.schema(), mapper.defaults()).await;
    if !report.is_valid() {
        return Err(IngestError::InvalidConfiguration(report));
    }

    let head: String = content
        .split_inclusive('\n')
        .take(PREVIEW_LINE_LIMIT)
        .collect();
    let records = read_records(config, head.as_bytes())?;
    debug!(records = records.len(), "previewing records");

    let mut produced = Vec::with_capacity(records.len());
    for record in &records {
        produced.push(mapper.map_record(config, &record.cells).await.objects);
    }
    let bundle = Bundle::from_records(produced);
    Ok(PreviewReport {
        objects: bundle.to_json_pretty()?,
        nb_entities: bundle.entity_count(),
        nb_relationships: bundle.relationship_count(),
    })
}
