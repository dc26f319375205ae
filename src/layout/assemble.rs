use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::ir::Graph;

use super::component::ComponentPlacement;
use super::{LayoutError, Point, PositionMap};

/// Merges component and starfield coordinates into the final map. Every
/// graph node must receive exactly one coordinate.
pub fn assemble_positions(
    graph: &Graph,
    placements: &[ComponentPlacement],
    scattered: &[(String, Point)],
) -> Result<PositionMap, LayoutError> {
    let mut positions: BTreeMap<String, Point> = BTreeMap::new();
    let produced = placements
        .iter()
        .flat_map(|placement| placement.positions.iter())
        .chain(scattered.iter());

    for (id, point) in produced {
        if !graph.nodes.contains_key(id) {
            return Err(LayoutError::UnknownNode(id.clone()));
        }
        match positions.entry(id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(*point);
            }
            Entry::Occupied(_) => return Err(LayoutError::DuplicatePosition(id.clone())),
        }
    }

    if let Some(missing) = graph.nodes.keys().find(|id| !positions.contains_key(*id)) {
        return Err(LayoutError::MissingPosition(missing.clone()));
    }

    Ok(PositionMap::from_map(positions))
}
