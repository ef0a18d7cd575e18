#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use rowgraph_model::object::{FROM, TO};

use crate::definition::{Field, MandatoryType, RefDefinition, TypeDefinition, TypeKind};
use crate::error::SchemaError;
use crate::loader::read_document;
use crate::settings::{StaticDefaults, TypeSettings};

/// Schema document as written on disk.
#[derive(Debug, Default, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub entities: Vec<TypeDefinition>,
    #[serde(default)]
    pub relationships: Vec<TypeDefinition>,
    /// Optional organisation settings shipped alongside the schema.
    #[serde(default)]
    pub settings: Vec<TypeSettings>,
}

/// Read-only registry of entity and relationship types.
///
/// The registry is injected into every entry point and never mutated by the
/// mapping engine, so one instance can serve concurrent record mappings.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: BTreeMap<String, TypeDefinition>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry and the settings bundled with it.
    pub fn from_document(doc: SchemaDocument) -> Result<(Self, StaticDefaults), SchemaError> {
        let mut registry = Self::new();
        for mut def in doc.entities {
            def.kind = TypeKind::Entity;
            registry.insert(def)?;
        }
        for mut def in doc.relationships {
            def.kind = TypeKind::Relationship;
            registry.insert(def)?;
        }
        for settings in &doc.settings {
            if !registry.types.contains_key(&settings.target_type) {
                return Err(SchemaError::InvalidSchema {
                    message: format!("settings for unknown type {}", settings.target_type),
                });
            }
        }
        debug!(types = registry.types.len(), "schema registry built");
        Ok((registry, StaticDefaults::new(doc.settings)))
    }

    /// Loads a `.toml` or `.json` schema document.
    pub fn load(path: &Path) -> Result<(Self, StaticDefaults), SchemaError> {
        let doc: SchemaDocument = read_document(path)?;
        Self::from_document(doc)
    }

    pub fn from_toml_str(contents: &str) -> Result<(Self, StaticDefaults), SchemaError> {
        let doc: SchemaDocument =
            toml::from_str(contents).map_err(|e| SchemaError::Toml {
                path: "<inline>".into(),
                source: e,
            })?;
        Self::from_document(doc)
    }

    /// Registers a type. Relationship types get implicit `from`/`to` references.
    pub fn insert(&mut self, mut def: TypeDefinition) -> Result<(), SchemaError> {
        let name = def.name.trim().to_string();
        if name.is_empty() {
            return Err(SchemaError::InvalidSchema {
                message: "type with an empty name".to_string(),
            });
        }
        if self.types.contains_key(&name) {
            return Err(SchemaError::DuplicateType { name });
        }
        if def.kind == TypeKind::Relationship {
            for endpoint in [FROM, TO] {
                if def.reference(endpoint).is_none() {
                    def.refs.push(RefDefinition {
                        name: endpoint.to_string(),
                        label: None,
                        multiple: false,
                        mandatory: MandatoryType::External,
                    });
                }
            }
        }
        let mut seen = BTreeSet::new();
        for field in def.fields() {
            if !seen.insert(field.name().to_string()) {
                return Err(SchemaError::DuplicateField {
                    entity_type: name,
                    field: field.name().to_string(),
                });
            }
        }
        def.name.clone_from(&name);
        self.types.insert(name, def);
        Ok(())
    }

    #[must_use]
    pub fn with_type(mut self, def: TypeDefinition) -> Self {
        if let Err(error) = self.insert(def) {
            debug!(%error, "type not registered");
        }
        self
    }

    pub fn get(&self, entity_type: &str) -> Option<&TypeDefinition> {
        self.types.get(entity_type)
    }

    pub fn is_entity_type(&self, entity_type: &str) -> bool {
        self.get(entity_type)
            .is_some_and(|def| def.kind == TypeKind::Entity)
    }

    pub fn is_relationship_type(&self, entity_type: &str) -> bool {
        self.get(entity_type)
            .is_some_and(|def| def.kind == TypeKind::Relationship)
    }

    pub fn field<'a>(&'a self, entity_type: &str, key: &str) -> Option<Field<'a>> {
        self.get(entity_type).and_then(|def| def.field(key))
    }

    /// Fields a mapping must populate: `external` ones, plus `customizable` ones the
    /// type settings mark mandatory.
    pub fn required_fields<'a>(
        &'a self,
        entity_type: &str,
        settings: Option<&TypeSettings>,
    ) -> Vec<Field<'a>> {
        let Some(def) = self.get(entity_type) else {
            return Vec::new();
        };
        def.fields()
            .filter(|field| match field.mandatory() {
                MandatoryType::External => true,
                MandatoryType::Customizable => {
                    settings.is_some_and(|s| s.is_mandatory(field.name()))
                }
                MandatoryType::Internal | MandatoryType::No => false,
            })
            .collect()
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::AttrType;

    #[test]
    fn relationship_types_get_endpoints() {
        let registry = SchemaRegistry::new().with_type(TypeDefinition::relationship("knows"));
        let from = registry.field("knows", "from").expect("from");
        assert!(from.is_reference());
        assert!(!from.multiple());
        assert_eq!(from.mandatory(), MandatoryType::External);
        assert!(registry.is_relationship_type("knows"));
        assert!(!registry.is_entity_type("knows"));
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let mut registry = SchemaRegistry::new();
        let def = TypeDefinition::entity("Person")
            .with_attribute("name", AttrType::String, false, MandatoryType::External)
            .with_ref("name", false, MandatoryType::No);
        assert!(matches!(
            registry.insert(def),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    fn customizable_fields_follow_settings() {
        let registry = SchemaRegistry::new().with_type(
            TypeDefinition::entity("Person")
                .with_attribute("name", AttrType::String, false, MandatoryType::External)
                .with_attribute("description", AttrType::String, false, MandatoryType::Customizable)
                .with_attribute("internal_id", AttrType::String, false, MandatoryType::Internal),
        );
        let names = |fields: Vec<Field<'_>>| -> Vec<String> {
            fields.iter().map(|f| f.name().to_string()).collect()
        };
        assert_eq!(names(registry.required_fields("Person", None)), vec!["name"]);

        let settings = TypeSettings {
            target_type: "Person".to_string(),
            attributes: vec![crate::settings::AttributeSetting {
                name: "description".to_string(),
                default_values: None,
                mandatory: true,
            }],
        };
        assert_eq!(
            names(registry.required_fields("Person", Some(&settings))),
            vec!["name", "description"]
        );
    }
}
