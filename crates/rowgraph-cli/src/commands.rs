use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use rowgraph_cli::inputs::{
    load_identities, load_mapper, load_schema, read_checked_records, read_text,
};
use rowgraph_cli::types::Outcome;
use rowgraph_ingest::{BatchReport, CancelFlag, IngestError, PreviewReport, ingest_with, preview};
use rowgraph_map::{OrderingStrategy, RecordMapper};
use rowgraph_model::ValidationReport;
use rowgraph_schema::SchemaRegistry;
use rowgraph_validate::validate;

use crate::cli::{IngestArgs, TestArgs, TypesArgs, ValidateArgs};

pub async fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    let config = load_mapper(&args.inputs.mapper)?;
    let (schema, defaults) = load_schema(&args.inputs.schema, args.inputs.settings.as_deref())?;
    let report = validate(&config, &schema, &defaults).await;

    if let Some(path) = &args.write_sanitized {
        if report.is_valid() {
            let json = serde_json::to_string_pretty(&config.sanitized())
                .context("serialize sanitized configuration")?;
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "sanitized configuration written");
        } else {
            warn!("configuration has issues, sanitized copy not written");
        }
    }
    Ok(report)
}

pub async fn run_test(args: &TestArgs) -> Result<Outcome<PreviewReport>> {
    let raw = read_text(&args.inputs.mapper)?;
    let content = read_text(&args.input)?;
    let (schema, defaults) = load_schema(&args.inputs.schema, args.inputs.settings.as_deref())?;
    let identities = load_identities(args.identities.as_deref())?;
    let mapper = RecordMapper::new(&schema, &defaults, &identities);

    match preview(&mapper, &raw, &content).await {
        Ok(report) => Ok(Outcome::Completed(report)),
        Err(IngestError::InvalidConfiguration(report)) => Ok(Outcome::Rejected(report)),
        Err(error) => Err(error).context("preview"),
    }
}

pub async fn run_ingest(args: &IngestArgs) -> Result<Outcome<BatchReport>> {
    let config = load_mapper(&args.inputs.mapper)?;
    let (schema, defaults) = load_schema(&args.inputs.schema, args.inputs.settings.as_deref())?;
    let identities = load_identities(args.identities.as_deref())?;
    let ordering = if args.topological {
        OrderingStrategy::Topological
    } else {
        OrderingStrategy::Heuristic
    };
    let mapper = RecordMapper::new(&schema, &defaults, &identities).with_ordering(ordering);

    let start = Instant::now();
    let records = match read_checked_records(&config, &schema, &defaults, &args.input).await? {
        Outcome::Completed(records) => records,
        Outcome::Rejected(report) => return Ok(Outcome::Rejected(report)),
    };

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping after the current record");
            on_interrupt.cancel();
        }
    });
    let progress = progress_bar(records.len() as u64);
    let result = ingest_with(&mapper, &config, &records, &cancel, |_| progress.inc(1)).await;
    interrupt.abort();
    progress.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(IngestError::InvalidConfiguration(report)) => return Ok(Outcome::Rejected(report)),
        Err(error) => return Err(error).context("ingest"),
    };

    let bundle = report
        .bundle
        .to_json_pretty()
        .context("serialize bundle")?;
    match &args.output {
        Some(path) => {
            fs::write(path, bundle).with_context(|| format!("write {}", path.display()))?;
        }
        None => println!("{bundle}"),
    }
    info!(
        objects = report.bundle.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(Outcome::Completed(report))
}

pub fn run_types(args: &TypesArgs) -> Result<SchemaRegistry> {
    let (schema, _) = load_schema(&args.schema, None)?;
    Ok(schema)
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} records ({eta})")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
