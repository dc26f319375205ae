mod assemble;
pub mod component;
mod components;
mod error;
mod force;
pub mod packing;
pub mod scatter;
mod stress;
pub(crate) mod types;
pub use assemble::assemble_positions;
pub use component::{
    ComponentPlacement, LayoutAlgorithm, LayoutAttempt, LayoutFailure, circular_layout,
    layout_component,
};
pub use components::{component_radius, partition_graph};
pub use error::LayoutError;
pub use packing::pack_circles;
pub use scatter::{group_sizes, scatter_isolated};
pub use types::*;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ComponentLayoutConfig, LayoutConfig};
use crate::ir::Graph;

/// Runs the whole pipeline: partition, pack, lay out each component,
/// scatter isolated nodes, assemble. Deterministic for a given graph and
/// config seeds.
#[tracing::instrument(skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn compute_positions(graph: &Graph, config: &LayoutConfig) -> Result<Positions, LayoutError> {
    let (components, isolated) = partition_graph(graph, &config.packing);

    let radii: Vec<f64> = components.iter().map(|comp| comp.radius).collect();
    let mut packing_rng = StdRng::seed_from_u64(config.packing.seed);
    let packing = pack_circles(&radii, &config.packing, &mut packing_rng);

    let placements = layout_components(&components, &packing, &config.component);
    let fallbacks: Vec<usize> = placements
        .iter()
        .filter(|placement| placement.fallback.is_some())
        .map(|placement| placement.index)
        .collect();

    let max_radius = if components.is_empty() {
        0.0
    } else {
        packing.outer_radius
    };
    let mut discrete = StdRng::seed_from_u64(config.scatter.discrete_seed);
    let mut continuous = StdRng::seed_from_u64(config.scatter.continuous_seed);
    let (scattered, scatter) = scatter_isolated(
        &isolated,
        max_radius,
        &config.scatter,
        &mut discrete,
        &mut continuous,
    )?;

    let map = assemble_positions(graph, &placements, &scattered)?;
    tracing::info!(
        positioned = map.len(),
        components = components.len(),
        isolated = isolated.len(),
        outer_radius = packing.outer_radius,
        fallbacks = fallbacks.len(),
        "positions computed"
    );

    Ok(Positions {
        map,
        components,
        packing,
        isolated,
        scatter,
        fallbacks,
    })
}

/// Same as [`compute_positions`], keeping only the final map.
pub fn compute_position_map(graph: &Graph, config: &LayoutConfig) -> Result<PositionMap, LayoutError> {
    compute_positions(graph, config).map(|positions| positions.map)
}

/// Where a component is laid out: its packed center pushed outward by
/// `center_spread`.
fn placement_center(packing: &PackedLayout, component: &Component, config: &ComponentLayoutConfig) -> Point {
    packing.centers[component.index].scale(config.center_spread)
}

#[cfg(feature = "parallel")]
fn layout_components(
    components: &[Component],
    packing: &PackedLayout,
    config: &ComponentLayoutConfig,
) -> Vec<ComponentPlacement> {
    use rayon::prelude::*;

    let place = |component: &Component| {
        let center = placement_center(packing, component, config);
        layout_component(component, center, component.radius, config)
    };
    if config.parallel {
        components.par_iter().map(place).collect()
    } else {
        components.iter().map(place).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn layout_components(
    components: &[Component],
    packing: &PackedLayout,
    config: &ComponentLayoutConfig,
) -> Vec<ComponentPlacement> {
    components
        .iter()
        .map(|component| {
            let center = placement_center(packing, component, config);
            layout_component(component, center, component.radius, config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family_graph() -> Graph {
        let mut graph = Graph::new();
        // one larger family, two couples, a trio and some loners
        for i in 1..15 {
            graph.add_edge("root", &format!("child{i:02}"));
        }
        graph.add_edge("child01", "grand01");
        graph.add_edge("child01", "grand02");
        graph.add_edge("ann", "bob");
        graph.add_edge("cid", "dee");
        graph.add_edge("eve", "fay");
        graph.add_edge("fay", "gus");
        for i in 0..9 {
            graph.ensure_node(&format!("loner{i}"));
        }
        graph
    }

    #[test]
    fn every_node_is_positioned_once() {
        let graph = family_graph();
        let positions = compute_positions(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(positions.map.len(), graph.node_count());
        for id in graph.nodes.keys() {
            let point = positions.map.get(id).unwrap();
            assert!(point.is_finite(), "{id} has non-finite position");
        }
        assert_eq!(positions.components.len(), 4);
        assert_eq!(positions.isolated.len(), 9);
        assert_eq!(positions.scatter.total(), 9);
        assert!(positions.fallbacks.is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let graph = family_graph();
        let config = LayoutConfig::default();
        let first = compute_position_map(&graph, &config).unwrap();
        let second = compute_position_map(&graph, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn sequential_and_parallel_layouts_agree() {
        let graph = family_graph();
        let mut config = LayoutConfig::default();
        config.component.parallel = true;
        let parallel = compute_position_map(&graph, &config).unwrap();
        config.component.parallel = false;
        let sequential = compute_position_map(&graph, &config).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn empty_graph_yields_empty_map() {
        let positions = compute_positions(&Graph::new(), &LayoutConfig::default()).unwrap();
        assert!(positions.map.is_empty());
        assert_eq!(positions.packing.outer_radius, 0.0);
    }

    #[test]
    fn edgeless_graph_is_all_starfield() {
        let mut graph = Graph::new();
        for i in 0..5 {
            graph.ensure_node(&format!("p{i}"));
        }
        let positions = compute_positions(&graph, &LayoutConfig::default()).unwrap();
        assert!(positions.components.is_empty());
        assert_eq!(positions.map.len(), 5);
        assert_eq!(
            (positions.scatter.band, positions.scatter.clusters, positions.scatter.diffuse),
            (2, 1, 2)
        );
        for (_, point) in positions.map.iter() {
            assert!(point.norm() > 0.0);
        }
    }

    #[test]
    fn lone_component_is_centered_on_origin() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        let positions = compute_positions(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(positions.packing.centers, vec![Point::ORIGIN]);
        let xs: f64 = positions.map.iter().map(|(_, p)| p.x).sum();
        let ys: f64 = positions.map.iter().map(|(_, p)| p.y).sum();
        assert!(xs.abs() < 1e-6 && ys.abs() < 1e-6);
    }

    #[test]
    fn parent_with_two_children_is_laid_out_in_line() {
        for (parent, left, right) in [("a", "b", "c"), ("b", "a", "c"), ("2", "1", "3")] {
            let mut graph = Graph::new();
            graph.add_edge(parent, left);
            graph.add_edge(parent, right);
            let positions = compute_positions(&graph, &LayoutConfig::default()).unwrap();
            assert!(positions.fallbacks.is_empty(), "{parent}: circular fallback used");

            let p = positions.map.get(parent).unwrap();
            let l = positions.map.get(left).unwrap();
            let r = positions.map.get(right).unwrap();
            let span = l.distance(r);
            assert!(span > p.distance(l) && span > p.distance(r));
            let mid = Point::new((l.x + r.x) / 2.0, (l.y + r.y) / 2.0);
            assert!(p.distance(mid) < 0.2 * span, "{parent} is not between its children");
        }
    }

    #[test]
    fn seed_changes_the_starfield_only_where_random() {
        let graph = family_graph();
        let base = compute_position_map(&graph, &LayoutConfig::default()).unwrap();
        let mut config = LayoutConfig::default();
        config.scatter.continuous_seed += 1;
        let other = compute_position_map(&graph, &config).unwrap();
        assert_eq!(base.get("root"), other.get("root"));
        assert_ne!(base.get("loner0"), other.get("loner0"));
    }
}
