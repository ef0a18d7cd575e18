//! Evaluation of one representation against one record.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use rowgraph_model::object::{FROM, TO};
use rowgraph_model::{ProducedObject, Representation, RepresentationKind, Value};
use rowgraph_schema::{
    DefaultValueProvider, Field, IdentityLookup, ResolvedIdentity, TypeDefinition, TypeKind,
    TypeSettings,
};

use crate::engine::RecordMapper;
use crate::error::MapError;
use crate::format::compute_default_value;
use crate::identity::standard_id;
use crate::record::ProducedSet;
use crate::resolve::{Scope, refs_from_identities, resolve_attribute};

/// Terminal state of a (representation, record) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Produced(ProducedObject),
    Skipped(SkipReason),
    Invalid(InvalidReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The representation has no target type and is inactive.
    NoTargetType,
    /// The target type is not a schema type of the representation's kind.
    UnknownTargetType(String),
    /// The activation predicate does not hold for the record.
    PredicateMismatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTargetType => f.write_str("no target type"),
            Self::UnknownTargetType(name) => write!(f, "unknown target type {name}"),
            Self::PredicateMismatch => f.write_str("activation predicate does not hold"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// A relationship without a resolved `from` or `to`.
    MissingEndpoint(&'static str),
    /// A required attribute or reference is still unset.
    MissingMandatory(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEndpoint(key) => write!(f, "relationship endpoint {key} is not resolved"),
            Self::MissingMandatory(key) => write!(f, "mandatory field {key} is not populated"),
        }
    }
}

impl<P, L> RecordMapper<'_, P, L>
where
    P: DefaultValueProvider,
    L: IdentityLookup,
{
    /// Evaluates one representation against a record.
    ///
    /// External lookups happen first and in one batch: the type settings, then
    /// every stored identifier the representation may need. Attribute resolution
    /// then runs without suspending.
    pub async fn evaluate<S: AsRef<str> + Sync>(
        &self,
        representation: &Representation,
        record: &[S],
        produced: &ProducedSet,
    ) -> Result<Evaluation, MapError> {
        let Some(entity_type) = representation.target_type() else {
            return Ok(Evaluation::Skipped(SkipReason::NoTargetType));
        };
        let expected_kind = match representation.kind {
            RepresentationKind::Entity => TypeKind::Entity,
            RepresentationKind::Relationship => TypeKind::Relationship,
        };
        let definition = match self.schema().get(entity_type) {
            Some(def) if def.kind == expected_kind => def,
            _ => {
                return Ok(Evaluation::Skipped(SkipReason::UnknownTargetType(
                    entity_type.to_string(),
                )));
            }
        };
        if let Some(predicate) = &representation.target.column_based {
            if !predicate.holds(record)? {
                return Ok(Evaluation::Skipped(SkipReason::PredicateMismatch));
            }
        }
        let is_relationship = representation.kind == RepresentationKind::Relationship;

        let settings = self.defaults().type_settings(entity_type).await;
        let ids = identifiers_to_resolve(representation, definition, settings.as_ref());
        let identities = if ids.is_empty() {
            BTreeMap::new()
        } else {
            self.identities().find_by_ids(&ids).await?
        };

        let scope = Scope {
            record,
            produced,
            identities: &identities,
            is_relationship,
        };
        let mut attributes = BTreeMap::new();
        for mapping in &representation.attributes {
            for (key, value) in resolve_attribute(mapping, definition, &scope)? {
                attributes.insert(key, value);
            }
        }
        if let Some(settings) = &settings {
            apply_type_defaults(&mut attributes, definition, settings, &identities);
        }

        if let Some(reason) = self.missing_field(definition, settings.as_ref(), &attributes) {
            return Ok(Evaluation::Invalid(reason));
        }

        let relationship_type = is_relationship.then(|| entity_type.to_string());
        let standard_id = standard_id(
            entity_type,
            Some(definition),
            relationship_type.as_deref(),
            &attributes,
        );
        Ok(Evaluation::Produced(ProducedObject {
            standard_id,
            kind: representation.kind,
            entity_type: entity_type.to_string(),
            relationship_type,
            representation: representation.id.clone(),
            attributes,
        }))
    }

    fn missing_field(
        &self,
        definition: &TypeDefinition,
        settings: Option<&TypeSettings>,
        attributes: &BTreeMap<String, Value>,
    ) -> Option<InvalidReason> {
        let populated = |key: &str| attributes.get(key).is_some_and(|value| !value.is_empty());
        if definition.kind == TypeKind::Relationship {
            for endpoint in [FROM, TO] {
                if !populated(endpoint) {
                    return Some(InvalidReason::MissingEndpoint(endpoint));
                }
            }
        }
        self.schema()
            .required_fields(&definition.name, settings)
            .into_iter()
            .find(|field| !populated(field.name()))
            .map(|field| InvalidReason::MissingMandatory(field.name().to_string()))
    }
}

/// Stored identifiers used as defaults of reference fields, deduplicated in first-seen order.
fn identifiers_to_resolve(
    representation: &Representation,
    definition: &TypeDefinition,
    settings: Option<&TypeSettings>,
) -> Vec<String> {
    let from_mappings = representation
        .attributes
        .iter()
        .filter(|mapping| definition.reference(&mapping.key).is_some())
        .filter_map(|mapping| mapping.defaults());
    let from_settings = settings
        .into_iter()
        .flat_map(|settings| settings.defaults())
        .filter(|(name, _)| definition.reference(name).is_some())
        .map(|(_, values)| values);

    let mut seen = BTreeSet::new();
    from_mappings
        .chain(from_settings)
        .flatten()
        .filter(|&id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Fills attributes still unset with the organisation defaults of the type.
fn apply_type_defaults(
    attributes: &mut BTreeMap<String, Value>,
    definition: &TypeDefinition,
    settings: &TypeSettings,
    identities: &BTreeMap<String, ResolvedIdentity>,
) {
    for (name, values) in settings.defaults() {
        if attributes.get(name).is_some_and(|value| !value.is_empty()) {
            continue;
        }
        let value = match definition.field(name) {
            Some(Field::Attribute(attr)) => compute_default_value(values, attr, None),
            Some(Field::Reference(reference)) => {
                refs_from_identities(values, reference.multiple, identities)
            }
            None => {
                debug!(entity_type = %definition.name, attribute = name, "default for unknown field ignored");
                None
            }
        };
        if let Some(value) = value {
            attributes.insert(name.to_string(), value);
        }
    }
}
