use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reasons a mapper configuration cannot be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigErrorKind {
    EmptyConfiguration,
    InvalidSeparator,
    InvalidSkipLineChar,
    DuplicateRepresentationId,
    UnknownTargetType,
    UnknownAttribute,
    MissingRequiredValue,
    MultipleNotAllowed,
    SelfReference,
    DanglingReference,
    ReferenceCycle,
}

impl ConfigErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyConfiguration => "empty_configuration",
            Self::InvalidSeparator => "invalid_separator",
            Self::InvalidSkipLineChar => "invalid_skip_line_char",
            Self::DuplicateRepresentationId => "duplicate_representation_id",
            Self::UnknownTargetType => "unknown_target_type",
            Self::UnknownAttribute => "unknown_attribute",
            Self::MissingRequiredValue => "missing_required_value",
            Self::MultipleNotAllowed => "multiple_not_allowed",
            Self::SelfReference => "self_reference",
            Self::DanglingReference => "dangling_reference",
            Self::ReferenceCycle => "reference_cycle",
        }
    }
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found in a mapper configuration before any record is mapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigIssue {
    pub kind: ConfigErrorKind,
    /// Representation label, e.g. `#2 Person`.
    pub representation: Option<String>,
    /// Attribute key (if applicable).
    pub attribute: Option<String>,
    /// Human-readable message describing the issue.
    pub message: String,
}

impl ConfigIssue {
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            representation: None,
            attribute: None,
            message: message.into(),
        }
    }

    pub fn in_representation(mut self, label: impl Into<String>) -> Self {
        self.representation = Some(label.into());
        self
    }

    pub fn on_attribute(mut self, key: impl Into<String>) -> Self {
        self.attribute = Some(key.into());
        self
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(representation) = &self.representation {
            write!(f, " {representation}")?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, " ({attribute})")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Validation outcome for one mapper configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(rename = "mapper")]
    pub mapper_name: String,
    pub issues: Vec<ConfigIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn has(&self, kind: ConfigErrorKind) -> bool {
        self.issues.iter().any(|issue| issue.kind == kind)
    }

    pub fn count_by_kind(&self) -> BTreeMap<ConfigErrorKind, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.kind).or_insert(0) += 1;
        }
        counts
    }
}
