//! Organisation-level type settings and the default-value provider.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::loader::read_document;

/// Per-attribute organisation setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSetting {
    pub name: String,
    #[serde(default)]
    pub default_values: Option<Vec<String>>,
    /// Makes a `customizable` field required.
    #[serde(default)]
    pub mandatory: bool,
}

/// Settings of one target type, already filtered by organisational policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeSettings {
    pub target_type: String,
    #[serde(default)]
    pub attributes: Vec<AttributeSetting>,
}

impl TypeSettings {
    /// Attributes that carry at least one default value.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes.iter().filter_map(|attr| {
            attr.default_values
                .as_deref()
                .filter(|values| !values.is_empty())
                .map(|values| (attr.name.as_str(), values))
        })
    }

    pub fn default_values(&self, name: &str) -> Option<&[String]> {
        self.defaults()
            .find(|(attr, _)| *attr == name)
            .map(|(_, values)| values)
    }

    pub fn is_mandatory(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|attr| attr.name == name && attr.mandatory)
    }
}

/// Source of organisation-wide default values.
///
/// Implementations are read-only from the engine's point of view and may be
/// shared across concurrent record mappings.
pub trait DefaultValueProvider: Send + Sync {
    fn type_settings(
        &self,
        entity_type: &str,
    ) -> impl Future<Output = Option<TypeSettings>> + Send;
}

/// In-memory settings keyed by target type.
#[derive(Debug, Clone, Default)]
pub struct StaticDefaults {
    by_type: BTreeMap<String, TypeSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    settings: Vec<TypeSettings>,
}

impl StaticDefaults {
    pub fn new<I>(settings: I) -> Self
    where
        I: IntoIterator<Item = TypeSettings>,
    {
        let by_type = settings
            .into_iter()
            .map(|s| (s.target_type.clone(), s))
            .collect();
        Self { by_type }
    }

    /// Loads a `.toml` or `.json` document with a top-level `settings` list.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let doc: SettingsDocument = read_document(path)?;
        Ok(Self::new(doc.settings))
    }

    pub fn get(&self, entity_type: &str) -> Option<&TypeSettings> {
        self.by_type.get(entity_type)
    }

    /// Settings of `other` replace these for the types both declare.
    #[must_use]
    pub fn merge(mut self, other: StaticDefaults) -> Self {
        self.by_type.extend(other.by_type);
        self
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl DefaultValueProvider for StaticDefaults {
    async fn type_settings(&self, entity_type: &str) -> Option<TypeSettings> {
        self.by_type.get(entity_type).cloned()
    }
}
