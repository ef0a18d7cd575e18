//! Reading delimited text the way a mapper configuration describes it.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use rowgraph_model::MapperConfig;

use crate::error::IngestError;

/// One input record with the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: u64,
    pub cells: Vec<String>,
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn reader_builder(config: &MapperConfig) -> Result<ReaderBuilder, IngestError> {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(config.separator_byte()?)
        .comment(config.skip_line_byte()?);
    Ok(builder)
}

/// Reads records from `input`: honours the separator, comment character and
/// header flag of the configuration and drops records whose cells are all empty.
pub fn read_records<R: Read>(config: &MapperConfig, input: R) -> Result<Vec<Record>, IngestError> {
    let mut reader = reader_builder(config)?.from_reader(input);
    let mut records = Vec::new();
    let mut header_pending = config.has_header;
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        if header_pending {
            header_pending = false;
            continue;
        }
        let line = record
            .position()
            .map_or(idx as u64 + 1, csv::Position::line);
        records.push(Record { line, cells });
    }
    debug!(records = records.len(), "records read");
    Ok(records)
}

pub fn read_records_from_path(config: &MapperConfig, path: &Path) -> Result<Vec<Record>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::io(path, e))?;
    read_records(config, file)
}
