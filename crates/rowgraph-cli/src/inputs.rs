//! Loading of the files a command works on.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use rowgraph_ingest::{Record, read_records_from_path};
use rowgraph_model::MapperConfig;
use rowgraph_schema::{DefaultValueProvider, InMemoryIdentityStore, SchemaRegistry, StaticDefaults};
use rowgraph_validate::validate;

use crate::types::Outcome;

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

pub fn load_mapper(path: &Path) -> Result<MapperConfig> {
    let raw = read_text(path)?;
    MapperConfig::from_json(&raw).with_context(|| format!("parse mapper {}", path.display()))
}

/// Loads the schema and its settings, then layers the settings file on top.
pub fn load_schema(path: &Path, settings: Option<&Path>) -> Result<(SchemaRegistry, StaticDefaults)> {
    let (schema, defaults) =
        SchemaRegistry::load(path).with_context(|| format!("load schema {}", path.display()))?;
    let defaults = match settings {
        Some(settings_path) => {
            let extra = StaticDefaults::load(settings_path)
                .with_context(|| format!("load settings {}", settings_path.display()))?;
            defaults.merge(extra)
        }
        None => defaults,
    };
    debug!(types = schema.len(), settings = defaults.len(), "schema loaded");
    Ok((schema, defaults))
}

/// Identity store from a file, or an empty one.
pub fn load_identities(path: Option<&Path>) -> Result<InMemoryIdentityStore> {
    match path {
        Some(path) => InMemoryIdentityStore::load(path)
            .with_context(|| format!("load identities {}", path.display())),
        None => Ok(InMemoryIdentityStore::default()),
    }
}

/// Validates the configuration, then reads the input with its separator and comment character.
///
/// The input is not opened when the configuration has issues.
pub async fn read_checked_records<P: DefaultValueProvider>(
    config: &MapperConfig,
    schema: &SchemaRegistry,
    defaults: &P,
    input: &Path,
) -> Result<Outcome<Vec<Record>>> {
    let report = validate(config, schema, defaults).await;
    if !report.is_valid() {
        return Ok(Outcome::Rejected(report));
    }
    let records =
        read_records_from_path(config, input).with_context(|| format!("read {}", input.display()))?;
    Ok(Outcome::Completed(records))
}
