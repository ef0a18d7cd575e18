//! Library side of the `rowgraph` binary.

pub mod inputs;
pub mod logging;
pub mod types;
