use rowgraph_model::ValidationReport;

/// Result of a command that validates its configuration before mapping.
#[derive(Debug)]
pub enum Outcome<T> {
    Completed(T),
    Rejected(ValidationReport),
}
