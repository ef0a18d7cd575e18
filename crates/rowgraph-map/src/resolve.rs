//! Attribute resolution: defaults, then column values, then based-on references.

use std::collections::BTreeMap;

use rowgraph_model::object::{FROM, FROM_TYPE, TO, TO_TYPE};
use rowgraph_model::{AttributeMapping, ProducedObject, Value, cell_at};
use rowgraph_schema::{Field, ResolvedIdentity, TypeDefinition};

use crate::error::MapError;
use crate::format::{compute_default_value, compute_value};
use crate::record::ProducedSet;

/// Everything an attribute may read while being resolved.
pub struct Scope<'a, S> {
    pub record: &'a [S],
    pub produced: &'a ProducedSet,
    /// Stored objects found for identifiers used as reference defaults.
    pub identities: &'a BTreeMap<String, ResolvedIdentity>,
    pub is_relationship: bool,
}

/// Resolves one attribute mapping into the `(key, value)` pairs it sets.
///
/// An empty result means the attribute stays absent. Relationship endpoints
/// also set their `fromType`/`toType` sibling.
pub fn resolve_attribute<S: AsRef<str>>(
    mapping: &AttributeMapping,
    definition: &TypeDefinition,
    scope: &Scope<'_, S>,
) -> Result<Vec<(String, Value)>, MapError> {
    let key = mapping.key.as_str();
    match definition.field(key) {
        Some(Field::Attribute(attr)) => {
            let config = mapping.column_configuration();
            let mut value = mapping
                .defaults()
                .and_then(|defaults| compute_default_value(defaults, attr, config));
            if let Some(column) = mapping.column_name() {
                let raw = cell_at(scope.record, column)?;
                if let Some(computed) = compute_value(raw, attr, config) {
                    value = Some(computed);
                }
            }
            Ok(value
                .map(|value| vec![(key.to_string(), value)])
                .unwrap_or_default())
        }
        Some(Field::Reference(reference)) => {
            let mut out = Vec::new();
            if let Some(ids) = mapping.defaults() {
                if let Some(value) = refs_from_identities(ids, reference.multiple, scope.identities) {
                    out = vec![(key.to_string(), value)];
                }
            }
            let found: Vec<&ProducedObject> = mapping
                .based_on_ids()
                .iter()
                .filter_map(|id| scope.produced.get(id))
                .collect();
            if let Some(first) = found.first() {
                out = if scope.is_relationship && (key == FROM || key == TO) {
                    let type_key = if key == FROM { FROM_TYPE } else { TO_TYPE };
                    vec![
                        (key.to_string(), Value::Ref(first.as_object_ref())),
                        (type_key.to_string(), Value::text(first.entity_type.clone())),
                    ]
                } else if reference.multiple {
                    let refs = found
                        .iter()
                        .map(|object| Value::Ref(object.as_object_ref()))
                        .collect();
                    vec![(key.to_string(), Value::List(refs))]
                } else {
                    vec![(key.to_string(), Value::Ref(first.as_object_ref()))]
                };
            }
            Ok(out)
        }
        None => Err(MapError::UnknownAttribute {
            entity_type: definition.name.clone(),
            key: key.to_string(),
        }),
    }
}

/// Turns identifiers into references to the stored objects they name.
///
/// Unknown identifiers are dropped. Single-valued references only consider the first identifier.
pub(crate) fn refs_from_identities(
    ids: &[String],
    multiple: bool,
    identities: &BTreeMap<String, ResolvedIdentity>,
) -> Option<Value> {
    if multiple {
        let refs: Vec<Value> = ids
            .iter()
            .filter_map(|id| identities.get(id))
            .map(|found| Value::Ref(found.object_ref()))
            .collect();
        return (!refs.is_empty()).then_some(Value::List(refs));
    }
    ids.first()
        .and_then(|id| identities.get(id))
        .map(|found| Value::Ref(found.object_ref()))
}
