//! Deterministic, content-addressed identities for produced objects.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use rowgraph_model::object::{FROM, TO};
use rowgraph_model::{StandardId, Value};
use rowgraph_schema::TypeDefinition;

/// Derives the identity of an object from its type and canonical content.
///
/// The digest covers the lowercased type plus the type's identity contributors
/// that are present. Entities fall back to every attribute when no contributor
/// is declared or present. Relationships always contribute their type and both
/// endpoints. References contribute their `standard_id` only, so the same
/// record mapped twice yields the same identity.
pub fn standard_id(
    entity_type: &str,
    definition: Option<&TypeDefinition>,
    relationship_type: Option<&str>,
    attributes: &BTreeMap<String, Value>,
) -> StandardId {
    let mut canonical = serde_json::Map::new();
    canonical.insert(
        "entity_type".to_string(),
        serde_json::Value::String(entity_type.to_lowercase()),
    );

    let contributors: Vec<&str> = definition
        .map(|def| {
            def.id_contributors
                .iter()
                .map(String::as_str)
                .filter(|name| attributes.contains_key(*name))
                .collect()
        })
        .unwrap_or_default();

    if let Some(relationship_type) = relationship_type {
        canonical.insert(
            "relationship_type".to_string(),
            serde_json::Value::String(relationship_type.to_lowercase()),
        );
        for key in [FROM, TO] {
            if let Some(value) = attributes.get(key) {
                canonical.insert(key.to_string(), value.to_json(true));
            }
        }
        for name in contributors {
            if let Some(value) = attributes.get(name) {
                canonical.insert(name.to_string(), value.to_json(true));
            }
        }
    } else if contributors.is_empty() {
        for (name, value) in attributes {
            canonical.insert(name.clone(), value.to_json(true));
        }
    } else {
        for name in contributors {
            if let Some(value) = attributes.get(name) {
                canonical.insert(name.to_string(), value.to_json(true));
            }
        }
    }

    // serde_json::Map is ordered by key, which keeps the serialization canonical.
    let bytes = serde_json::Value::Object(canonical).to_string();
    let mut hasher = Sha256::new();
    hasher.update(bytes.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    StandardId::from_first_16_bytes_of_sha256(entity_type, digest)
}
