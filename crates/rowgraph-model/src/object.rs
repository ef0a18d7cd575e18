use std::collections::BTreeMap;

use serde::Serialize;

use crate::{ObjectRef, RepresentationId, RepresentationKind, StandardId, Value};

/// Relationship endpoint keys and their sibling type fields.
pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const FROM_TYPE: &str = "fromType";
pub const TO_TYPE: &str = "toType";

/// An entity or relationship produced from one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProducedObject {
    pub standard_id: StandardId,
    #[serde(rename = "type")]
    pub kind: RepresentationKind,
    pub entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    /// Representation that produced the object; not part of the serialized form.
    #[serde(skip)]
    pub representation: RepresentationId,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl ProducedObject {
    pub fn is_relationship(&self) -> bool {
        self.kind == RepresentationKind::Relationship
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn from_ref(&self) -> Option<&ObjectRef> {
        self.get(FROM).and_then(Value::as_ref_object)
    }

    pub fn to_ref(&self) -> Option<&ObjectRef> {
        self.get(TO).and_then(Value::as_ref_object)
    }

    /// Reference to this object for use as another object's attribute value.
    pub fn as_object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.standard_id.clone()).with_type(self.entity_type.clone())
    }
}
