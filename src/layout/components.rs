use std::collections::{BTreeMap, HashSet};

use crate::config::PackingConfig;
use crate::ir::Graph;

use super::Component;

/// Target packing radius for a component of `size` nodes.
pub fn component_radius(size: usize, config: &PackingConfig) -> f64 {
    let factor = if size < config.small_component_threshold {
        config.small_radius_factor
    } else {
        config.large_radius_factor
    };
    config.padding * (size as f64).sqrt() * factor
}

/// Connected components (degree ≥ 1) ordered by their smallest id, and the
/// sorted list of degree-zero nodes.
#[tracing::instrument(skip_all)]
pub fn partition_graph(graph: &Graph, config: &PackingConfig) -> (Vec<Component>, Vec<String>) {
    let adjacency = graph.adjacency();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut components = Vec::new();
    let mut isolated = Vec::new();

    for (&node_id, neighbors) in &adjacency {
        if neighbors.is_empty() {
            isolated.push(node_id.to_string());
            continue;
        }
        if !visited.insert(node_id) {
            continue;
        }
        let mut stack = vec![node_id];
        let mut members = Vec::new();
        while let Some(cur) = stack.pop() {
            members.push(cur);
            if let Some(next) = adjacency.get(cur) {
                for &neighbor in next {
                    if visited.insert(neighbor) {
                        stack.push(neighbor);
                    }
                }
            }
        }
        members.sort_unstable();

        let local: BTreeMap<&str, usize> = members
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx))
            .collect();
        let mut edges = Vec::new();
        for edge in &graph.edges {
            if let (Some(&a), Some(&b)) = (local.get(edge.a.as_str()), local.get(edge.b.as_str())) {
                edges.push((a, b));
            }
        }

        let size = members.len();
        components.push(Component {
            index: components.len(),
            nodes: members.into_iter().map(str::to_string).collect(),
            edges,
            radius: component_radius(size, config),
        });
    }

    tracing::debug!(
        components = components.len(),
        isolated = isolated.len(),
        "partitioned graph"
    );
    (components, isolated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(edges: &[(&str, &str)], extra: &[&str]) -> Graph {
        let mut graph = Graph::new();
        for id in extra {
            graph.ensure_node(id);
        }
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    #[test]
    fn radius_uses_two_regimes() {
        let config = PackingConfig::default();
        let small = component_radius(4, &config);
        assert!((small - 250.0 * 2.0 * 0.8).abs() < 1e-9);
        let nine = component_radius(9, &config);
        assert!((nine - 250.0 * 3.0 * 0.8).abs() < 1e-9);
        let ten = component_radius(10, &config);
        assert!((ten - 250.0 * 10f64.sqrt() * 1.2).abs() < 1e-9);
    }

    #[test]
    fn splits_components_and_isolated_nodes() {
        let graph = graph_from(&[("a", "b"), ("b", "c"), ("x", "y")], &["lonely", "z"]);
        let (components, isolated) = partition_graph(&graph, &PackingConfig::default());
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].nodes, vec!["a", "b", "c"]);
        assert_eq!(components[0].edges.len(), 2);
        assert_eq!(components[1].nodes, vec!["x", "y"]);
        assert_eq!(components[1].index, 1);
        assert_eq!(components[1].point_count(), 2);
        assert_eq!(isolated, vec!["lonely", "z"]);
    }

    #[test]
    fn empty_graph_has_no_components() {
        let (components, isolated) = partition_graph(&Graph::new(), &PackingConfig::default());
        assert!(components.is_empty());
        assert!(isolated.is_empty());
    }

    #[test]
    fn every_node_lands_in_exactly_one_bucket() {
        let graph = graph_from(
            &[("1", "2"), ("2", "3"), ("4", "5"), ("6", "7"), ("7", "4")],
            &["8", "9"],
        );
        let (components, isolated) = partition_graph(&graph, &PackingConfig::default());
        let mut seen: Vec<String> = components
            .iter()
            .flat_map(|comp| comp.nodes.iter().cloned())
            .chain(isolated.iter().cloned())
            .collect();
        seen.sort();
        let expected: Vec<String> = graph.nodes.keys().cloned().collect();
        assert_eq!(seen, expected);
    }
}
