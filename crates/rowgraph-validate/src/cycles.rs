use std::collections::{BTreeMap, BTreeSet};

use rowgraph_model::MapperConfig;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Finds the cycles closed by back edges of a depth-first walk over the based-on
/// graph, as representation indices.
///
/// Any cyclic configuration yields at least one cycle, but not every elementary
/// cycle is listed. Each cycle is reported once, rotated so that its lowest index
/// comes first.
/// Self-references are not cycles here; they are reported on their own.
pub fn find_cycles(config: &MapperConfig) -> Vec<Vec<usize>> {
    let mut index = BTreeMap::new();
    for (idx, representation) in config.representations.iter().enumerate() {
        index.entry(representation.id.as_str()).or_insert(idx);
    }
    let edges: Vec<Vec<usize>> = config
        .representations
        .iter()
        .enumerate()
        .map(|(idx, representation)| {
            let targets: BTreeSet<usize> = representation
                .referenced_ids()
                .filter_map(|id| index.get(id.as_str()).copied())
                .filter(|target| *target != idx)
                .collect();
            targets.into_iter().collect()
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; edges.len()];
    let mut stack = Vec::new();
    let mut found = BTreeSet::new();
    for start in 0..edges.len() {
        if marks[start] == Mark::Unvisited {
            visit(start, &edges, &mut marks, &mut stack, &mut found);
        }
    }
    found.into_iter().collect()
}

fn visit(
    node: usize,
    edges: &[Vec<usize>],
    marks: &mut [Mark],
    stack: &mut Vec<usize>,
    found: &mut BTreeSet<Vec<usize>>,
) {
    marks[node] = Mark::OnStack;
    stack.push(node);
    for &next in &edges[node] {
        match marks[next] {
            Mark::Unvisited => visit(next, edges, marks, stack, found),
            Mark::OnStack => {
                if let Some(pos) = stack.iter().position(|n| *n == next) {
                    found.insert(canonical(&stack[pos..]));
                }
            }
            Mark::Done => {}
        }
    }
    stack.pop();
    marks[node] = Mark::Done;
}

fn canonical(cycle: &[usize]) -> Vec<usize> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, n)| **n)
        .map_or(0, |(pos, _)| pos);
    cycle[start..].iter().chain(&cycle[..start]).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(edges: &[(&str, Vec<&str>)]) -> MapperConfig {
        let representations: Vec<serde_json::Value> = edges
            .iter()
            .map(|(id, targets)| {
                serde_json::json!({
                    "id": id,
                    "type": "entity",
                    "attributes": [ { "key": "x", "based_on": { "representations": targets } } ]
                })
            })
            .collect();
        MapperConfig::from_json(&serde_json::json!({ "representations": representations }).to_string())
            .unwrap()
    }

    #[test]
    fn two_cycle() {
        let cfg = config(&[("a", vec!["b"]), ("b", vec!["a"])]);
        assert_eq!(find_cycles(&cfg), vec![vec![0, 1]]);
    }

    #[test]
    fn long_cycle_is_found() {
        let cfg = config(&[("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["d"]), ("d", vec!["b"])]);
        assert_eq!(find_cycles(&cfg), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn each_back_edge_closes_one_cycle() {
        let cfg = config(&[("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec!["a"])]);
        assert_eq!(find_cycles(&cfg), vec![vec![0, 1], vec![0, 1, 2]]);
    }

    #[test]
    fn acyclic_and_self_loops_are_not_cycles() {
        let cfg = config(&[("a", vec!["a", "b"]), ("b", vec!["c"]), ("c", vec![]), ("d", vec!["missing"])]);
        assert!(find_cycles(&cfg).is_empty());
    }
}
