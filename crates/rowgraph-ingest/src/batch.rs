//! Batch ingestion: maps records one by one and assembles the bundle.

use serde::Serialize;
use tracing::{Instrument, info, info_span};

use rowgraph_map::{RecordMapper, RecordOutcome};
use rowgraph_model::{MapperConfig, ProducedObject};
use rowgraph_schema::{DefaultValueProvider, IdentityLookup};

use crate::cancel::CancelFlag;
use crate::error::IngestError;
use crate::reader::Record;

/// Objects of a batch, all entities first, then all relationships.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bundle {
    pub objects: Vec<ProducedObject>,
}

impl Bundle {
    /// Merges per-record object lists, keeping record and evaluation order within each group.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Vec<ProducedObject>>,
    {
        let (mut entities, relationships): (Vec<_>, Vec<_>) = records
            .into_iter()
            .flatten()
            .partition(|object| !object.is_relationship());
        entities.extend(relationships);
        Self { objects: entities }
    }

    pub fn entity_count(&self) -> usize {
        self.objects.iter().filter(|o| !o.is_relationship()).count()
    }

    pub fn relationship_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_relationship()).count()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Bundle document handed to the persistence side.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "type": "bundle", "objects": self.objects })
    }

    pub fn to_json_pretty(&self) -> Result<String, IngestError> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}

/// Counts for one input record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub line: u64,
    pub produced: usize,
    pub skipped: usize,
    pub invalid: usize,
    pub failed: usize,
}

impl RecordSummary {
    fn from_outcome(line: u64, outcome: &RecordOutcome) -> Self {
        Self {
            line,
            produced: outcome.produced(),
            skipped: outcome.skipped,
            invalid: outcome.invalid,
            failed: outcome.failed(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals {
    pub records: usize,
    pub entities: usize,
    pub relationships: usize,
    pub skipped: usize,
    pub invalid: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub bundle: Bundle,
    pub summaries: Vec<RecordSummary>,
    pub totals: BatchTotals,
    /// Set when the batch stopped early because it was cancelled.
    pub cancelled: bool,
}

/// Maps every record of a batch. See [`ingest_with`].
pub async fn ingest<P, L>(
    mapper: &RecordMapper<'_, P, L>,
    config: &MapperConfig,
    records: &[Record],
    cancel: &CancelFlag,
) -> Result<BatchReport, IngestError>
where
    P: DefaultValueProvider,
    L: IdentityLookup,
{
    ingest_with(mapper, config, records, cancel, |_| {}).await
}

/// Maps every record of a batch, calling `on_record` after each one.
///
/// The configuration is validated first and an invalid one is refused with all
/// of its issues. Cancellation is checked between records; records already
/// mapped stay in the report.
pub async fn ingest_with<P, L, F>(
    mapper: &RecordMapper<'_, P, L>,
    config: &MapperConfig,
    records: &[Record],
    cancel: &CancelFlag,
    mut on_record: F,
) -> Result<BatchReport, IngestError>
where
    P: DefaultValueProvider,
    L: IdentityLookup,
    F: FnMut(&RecordSummary),
{
    let report = rowgraph_validate::validate(config, mapper.schema(), mapper.defaults()).await;
    if !report.is_valid() {
        return Err(IngestError::InvalidConfiguration(report));
    }

    let span = info_span!("ingest", mapper = %config.name, records = records.len());
    async move {
        let mut summaries = Vec::with_capacity(records.len());
        let mut produced = Vec::with_capacity(records.len());
        let mut totals = BatchTotals::default();
        let mut cancelled = false;

        for record in records {
            if cancel.is_cancelled() {
                info!(line = record.line, "ingestion cancelled");
                cancelled = true;
                break;
            }
            let outcome = mapper
                .map_record(config, &record.cells)
                .instrument(info_span!("record", line = record.line))
                .await;
            let summary = RecordSummary::from_outcome(record.line, &outcome);
            totals.records += 1;
            totals.entities += outcome.entity_count();
            totals.relationships += outcome.relationship_count();
            totals.skipped += summary.skipped;
            totals.invalid += summary.invalid;
            totals.failed += summary.failed;
            on_record(&summary);
            summaries.push(summary);
            produced.push(outcome.objects);
        }

        let bundle = Bundle::from_records(produced);
        info!(
            records = totals.records,
            entities = totals.entities,
            relationships = totals.relationships,
            invalid = totals.invalid,
            failed = totals.failed,
            cancelled,
            "batch mapped"
        );
        Ok(BatchReport {
            bundle,
            summaries,
            totals,
            cancelled,
        })
    }
    .instrument(span)
    .await
}
