//! Delimited-text ingestion driven by a mapper configuration.

pub mod batch;
pub mod cancel;
pub mod error;
pub mod preview;
pub mod reader;

pub use batch::{BatchReport, BatchTotals, Bundle, RecordSummary, ingest, ingest_with};
pub use cancel::CancelFlag;
pub use error::IngestError;
pub use preview::{PREVIEW_LINE_LIMIT, PreviewReport, preview, preview_config};
pub use reader::{Record, read_records, read_records_from_path};
