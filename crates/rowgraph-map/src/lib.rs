//! Mapping engine: turns one delimited record into entities and relationships.

pub mod engine;
pub mod error;
pub mod evaluate;
pub mod format;
pub mod identity;
pub mod ordering;
pub mod record;
pub mod resolve;

pub use engine::{RecordMapper, RecordOutcome, RepresentationFailure};
pub use error::MapError;
pub use evaluate::{Evaluation, InvalidReason, SkipReason};
pub use format::{compute_default_value, compute_value, format_value, parse_date};
pub use ordering::{OrderingStrategy, evaluation_order};
pub use record::ProducedSet;
