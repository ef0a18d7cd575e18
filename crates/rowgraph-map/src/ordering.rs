//! Evaluation order of the representations of one configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use rowgraph_model::{MapperConfig, Representation, RepresentationKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingStrategy {
    /// Entities by ascending based-on count, then relationships, both stable.
    #[default]
    Heuristic,
    /// Entities in dependency-first order. Falls back to the heuristic on cycles.
    Topological,
}

/// Returns the representations in the order they are evaluated for every record.
pub fn evaluation_order(config: &MapperConfig, strategy: OrderingStrategy) -> Vec<&Representation> {
    let entities: Vec<&Representation> = config
        .representations
        .iter()
        .filter(|r| r.kind == RepresentationKind::Entity)
        .collect();
    let relationships = config
        .representations
        .iter()
        .filter(|r| r.kind == RepresentationKind::Relationship);

    let mut ordered = match strategy {
        OrderingStrategy::Heuristic => by_based_on_count(entities),
        OrderingStrategy::Topological => match topological(&entities) {
            Some(order) => order,
            None => {
                debug!("based-on graph is cyclic, using heuristic order");
                by_based_on_count(entities)
            }
        },
    };
    ordered.extend(relationships);
    ordered
}

fn by_based_on_count(mut entities: Vec<&Representation>) -> Vec<&Representation> {
    // sort_by_key is stable, so ties keep declaration order.
    entities.sort_by_key(|r| r.based_on_count());
    entities
}

/// Kahn's algorithm over entity representations, ties broken by declaration order.
fn topological<'a>(entities: &[&'a Representation]) -> Option<Vec<&'a Representation>> {
    let index: BTreeMap<&str, usize> = entities
        .iter()
        .enumerate()
        .map(|(idx, r)| (r.id.as_str(), idx))
        .collect();

    let mut in_degree = vec![0usize; entities.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); entities.len()];
    for (idx, representation) in entities.iter().enumerate() {
        let deps: BTreeSet<usize> = representation
            .referenced_ids()
            .filter_map(|id| index.get(id.as_str()).copied())
            .collect();
        for dep in deps {
            in_degree[idx] += 1;
            dependents[dep].push(idx);
        }
    }

    let mut ready: BTreeSet<usize> = (0..entities.len()).filter(|idx| in_degree[*idx] == 0).collect();
    let mut order = Vec::with_capacity(entities.len());
    while let Some(idx) = ready.pop_first() {
        order.push(entities[idx]);
        for &next in &dependents[idx] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.insert(next);
            }
        }
    }
    (order.len() == entities.len()).then_some(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(doc: serde_json::Value) -> MapperConfig {
        MapperConfig::from_json(&doc.to_string()).unwrap()
    }

    fn ids(order: &[&Representation]) -> Vec<String> {
        order.iter().map(|r| r.id.to_string()).collect()
    }

    fn chain() -> MapperConfig {
        // a <- b <- c, declared so that the heuristic cannot resolve the chain.
        config(serde_json::json!({ "representations": [
            { "id": "rel", "type": "relationship", "target": { "entity_type": "knows" } },
            { "id": "c", "type": "entity", "target": { "entity_type": "T" }, "attributes": [
                { "key": "x", "based_on": { "representations": ["b"] } } ] },
            { "id": "b", "type": "entity", "target": { "entity_type": "T" }, "attributes": [
                { "key": "x", "based_on": { "representations": ["a"] } } ] },
            { "id": "a", "type": "entity", "target": { "entity_type": "T" } }
        ] }))
    }

    #[test]
    fn heuristic_puts_entities_first_by_based_on_count() {
        let config = chain();
        let order = evaluation_order(&config, OrderingStrategy::Heuristic);
        assert_eq!(ids(&order), vec!["a", "c", "b", "rel"]);
    }

    #[test]
    fn topological_resolves_chains() {
        let config = chain();
        let order = evaluation_order(&config, OrderingStrategy::Topological);
        assert_eq!(ids(&order), vec!["a", "b", "c", "rel"]);
    }

    #[test]
    fn topological_falls_back_on_cycles() {
        let config = config(serde_json::json!({ "representations": [
            { "id": "a", "type": "entity", "attributes": [
                { "key": "x", "based_on": { "representations": ["b"] } } ] },
            { "id": "b", "type": "entity", "attributes": [
                { "key": "x", "based_on": { "representations": ["a"] } } ] },
            { "id": "c", "type": "entity" }
        ] }));
        let order = evaluation_order(&config, OrderingStrategy::Topological);
        assert_eq!(ids(&order), vec!["c", "a", "b"]);
    }
}
