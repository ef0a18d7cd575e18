//! Mapper configuration: how records become entities and relationships.
//!
//! The configuration is authored elsewhere and only read here. Field names follow
//! the JSON document the authoring side produces.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::column::cell_at;
use crate::{ModelError, RepresentationId};

const DEFAULT_SEPARATOR: &str = ",";

/// Complete mapping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperConfig {
    #[serde(default)]
    pub name: String,
    /// Field separator of the delimited input.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// When set, the first record of the input is a header and is not mapped.
    #[serde(default)]
    pub has_header: bool,
    /// Lines starting with this character are ignored.
    #[serde(default)]
    pub skip_line_char: Option<String>,
    #[serde(default, deserialize_with = "representations_from_value")]
    pub representations: Vec<Representation>,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

/// Accepts representations either inline or embedded as a JSON string, the way
/// stored configurations carry them.
fn representations_from_value<'de, D>(deserializer: D) -> Result<Vec<Representation>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(raw) => {
            serde_json::from_str(&raw).map_err(serde::de::Error::custom)
        }
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

impl MapperConfig {
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn separator_byte(&self) -> Result<u8, ModelError> {
        single_ascii(&self.separator).ok_or_else(|| ModelError::InvalidSeparator(self.separator.clone()))
    }

    pub fn skip_line_byte(&self) -> Result<Option<u8>, ModelError> {
        match self.skip_line_char.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => single_ascii(raw)
                .map(Some)
                .ok_or_else(|| ModelError::InvalidSkipLineChar(raw.to_string())),
        }
    }

    pub fn representation(&self, id: &RepresentationId) -> Option<&Representation> {
        self.representations.iter().find(|r| &r.id == id)
    }

    /// Drops attribute mappings that have neither a column nor a based-on reference.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        for representation in &mut out.representations {
            representation
                .attributes
                .retain(|attr| attr.column_name().is_some() || !attr.based_on_ids().is_empty());
        }
        out
    }
}

fn single_ascii(raw: &str) -> Option<u8> {
    match raw.as_bytes() {
        [byte] if byte.is_ascii() => Some(*byte),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentationKind {
    Entity,
    Relationship,
}

impl RepresentationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Relationship => "relationship",
        }
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blueprint for producing one entity or relationship from a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Representation {
    pub id: RepresentationId,
    #[serde(rename = "type")]
    pub kind: RepresentationKind,
    #[serde(default)]
    pub target: RepresentationTarget,
    #[serde(default)]
    pub attributes: Vec<AttributeMapping>,
}

impl Representation {
    /// Target type, `None` when unset or blank (the representation is inactive).
    pub fn target_type(&self) -> Option<&str> {
        self.target
            .entity_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Number of attributes populated from other representations.
    pub fn based_on_count(&self) -> usize {
        self.attributes
            .iter()
            .filter(|attr| !attr.based_on_ids().is_empty())
            .count()
    }

    /// Every representation id this one references, in declaration order.
    pub fn referenced_ids(&self) -> impl Iterator<Item = &RepresentationId> {
        self.attributes.iter().flat_map(AttributeMapping::based_on_ids)
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeMapping> {
        self.attributes.iter().find(|attr| attr.key == key)
    }

    /// Display label used in configuration issues: `#<n> <type>` or
    /// `#<n> New <kind> representation` when no type is set.
    pub fn label(&self, index: usize) -> String {
        let number = index + 1;
        match self.target_type() {
            Some(target) => format!("#{number} {target}"),
            None => format!("#{number} New {} representation", self.kind),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepresentationTarget {
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Activation predicate; the representation only applies when it holds.
    #[serde(default)]
    pub column_based: Option<ActivationPredicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Neq,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationPredicate {
    pub column_reference: String,
    pub operator: Operator,
    pub value: String,
}

impl ActivationPredicate {
    /// Compares the raw cell (untrimmed) against the configured literal.
    pub fn holds<S: AsRef<str>>(&self, record: &[S]) -> Result<bool, ModelError> {
        let cell = cell_at(record, &self.column_reference)?;
        Ok(match self.operator {
            Operator::Eq => cell == self.value,
            Operator::Neq => cell != self.value,
        })
    }
}

/// One computed field of a representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeMapping {
    pub key: String,
    #[serde(default)]
    pub column: Option<AttributeColumn>,
    #[serde(default)]
    pub default_values: Option<Vec<String>>,
    #[serde(default)]
    pub based_on: Option<BasedOn>,
}

impl AttributeMapping {
    pub fn column_name(&self) -> Option<&str> {
        self.column
            .as_ref()
            .and_then(|column| column.column_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    pub fn column_configuration(&self) -> Option<&ColumnConfiguration> {
        self.column
            .as_ref()
            .and_then(|column| column.configuration.as_ref())
    }

    pub fn based_on_ids(&self) -> &[RepresentationId] {
        self.based_on
            .as_ref()
            .map(|based_on| based_on.representations.as_slice())
            .unwrap_or(&[])
    }

    /// Configured literal defaults, `None` when absent or empty.
    pub fn defaults(&self) -> Option<&[String]> {
        self.default_values
            .as_deref()
            .filter(|values| !values.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeColumn {
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub configuration: Option<ColumnConfiguration>,
}

/// Per-type formatting options for a column-sourced attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnConfiguration {
    /// Splits multi-valued cells.
    #[serde(default)]
    pub separator: Option<String>,
    /// chrono `strftime` pattern for date cells.
    #[serde(default)]
    pub pattern_date: Option<String>,
    /// IANA timezone name the date pattern is read in.
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasedOn {
    #[serde(default)]
    pub representations: Vec<RepresentationId>,
}
