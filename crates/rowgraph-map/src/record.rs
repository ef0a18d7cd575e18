use std::collections::BTreeMap;

use rowgraph_model::{ProducedObject, RepresentationId};

/// Objects produced so far for one record, addressable by representation id.
///
/// Owned by a single record mapping and dropped with it. Iteration follows
/// insertion order, which is the evaluation order.
#[derive(Debug, Default)]
pub struct ProducedSet {
    objects: Vec<ProducedObject>,
    by_representation: BTreeMap<RepresentationId, usize>,
}

impl ProducedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &RepresentationId) -> Option<&ProducedObject> {
        self.by_representation
            .get(id)
            .and_then(|idx| self.objects.get(*idx))
    }

    /// Adds an object. A second object for the same representation replaces the first in place.
    pub fn insert(&mut self, object: ProducedObject) {
        match self.by_representation.get(&object.representation) {
            Some(idx) => self.objects[*idx] = object,
            None => {
                self.by_representation
                    .insert(object.representation.clone(), self.objects.len());
                self.objects.push(object);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProducedObject> {
        self.objects.iter()
    }

    pub fn into_objects(self) -> Vec<ProducedObject> {
        self.objects
    }
}
