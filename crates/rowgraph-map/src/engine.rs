//! Record mapping: drives representation evaluation for one record.

use tracing::{debug, warn};

use rowgraph_model::{MapperConfig, ProducedObject, RepresentationId};
use rowgraph_schema::{DefaultValueProvider, IdentityLookup, SchemaRegistry};

use crate::error::MapError;
use crate::evaluate::Evaluation;
use crate::ordering::{OrderingStrategy, evaluation_order};
use crate::record::ProducedSet;

/// A representation that failed hard for one record.
#[derive(Debug)]
pub struct RepresentationFailure {
    pub representation: RepresentationId,
    pub error: MapError,
}

/// Result of mapping one record.
#[derive(Debug, Default)]
pub struct RecordOutcome {
    /// Produced objects in evaluation order.
    pub objects: Vec<ProducedObject>,
    pub skipped: usize,
    pub invalid: usize,
    pub failures: Vec<RepresentationFailure>,
}

impl RecordOutcome {
    pub fn produced(&self) -> usize {
        self.objects.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn entity_count(&self) -> usize {
        self.objects.iter().filter(|o| !o.is_relationship()).count()
    }

    pub fn relationship_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_relationship()).count()
    }
}

/// Maps records with read-only access to the schema and the lookup collaborators.
///
/// Holds no per-record state, so one mapper can serve any number of records,
/// concurrently or not.
#[derive(Debug)]
pub struct RecordMapper<'a, P, L> {
    schema: &'a SchemaRegistry,
    defaults: &'a P,
    identities: &'a L,
    ordering: OrderingStrategy,
}

impl<'a, P, L> RecordMapper<'a, P, L>
where
    P: DefaultValueProvider,
    L: IdentityLookup,
{
    pub fn new(schema: &'a SchemaRegistry, defaults: &'a P, identities: &'a L) -> Self {
        Self {
            schema,
            defaults,
            identities,
            ordering: OrderingStrategy::default(),
        }
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingStrategy) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn ordering(&self) -> OrderingStrategy {
        self.ordering
    }

    pub fn schema(&self) -> &'a SchemaRegistry {
        self.schema
    }

    pub fn defaults(&self) -> &'a P {
        self.defaults
    }

    pub fn identities(&self) -> &'a L {
        self.identities
    }

    /// Maps one record: entities first, then relationships.
    ///
    /// Skipped, invalid and failed representations are counted and never stop
    /// the remaining representations of the record.
    pub async fn map_record<S: AsRef<str> + Sync>(
        &self,
        config: &MapperConfig,
        record: &[S],
    ) -> RecordOutcome {
        let mut produced = ProducedSet::new();
        let mut outcome = RecordOutcome::default();
        for representation in evaluation_order(config, self.ordering) {
            let id = &representation.id;
            match self.evaluate(representation, record, &produced).await {
                Ok(Evaluation::Produced(object)) => {
                    debug!(representation = %id, standard_id = %object.standard_id, "object produced");
                    produced.insert(object);
                }
                Ok(Evaluation::Skipped(reason)) => {
                    debug!(representation = %id, %reason, "representation skipped");
                    outcome.skipped += 1;
                }
                Ok(Evaluation::Invalid(reason)) => {
                    debug!(representation = %id, %reason, "object dropped");
                    outcome.invalid += 1;
                }
                Err(error) => {
                    warn!(representation = %id, %error, "representation failed");
                    outcome.failures.push(RepresentationFailure {
                        representation: id.clone(),
                        error,
                    });
                }
            }
        }
        outcome.objects = produced.into_objects();
        outcome
    }
}
