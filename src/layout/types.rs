use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn polar(radius: f64, angle: f64) -> Self {
        Self {
            x: radius * angle.cos(),
            y: radius * angle.sin(),
        }
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A maximal connected set of nodes, sorted by id.
#[derive(Debug, Clone)]
pub struct Component {
    pub index: usize,
    pub nodes: Vec<String>,
    pub edges: Vec<(usize, usize)>,
    pub radius: f64,
}

impl Component {
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Kept for downstream annotation; always equal to `size`.
    pub fn point_count(&self) -> usize {
        self.nodes.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackedLayout {
    /// One center per component, in component order.
    pub centers: Vec<Point>,
    pub radii: Vec<f64>,
    pub outer_radius: f64,
}

/// Final node id to coordinate mapping. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PositionMap {
    positions: BTreeMap<String, Point>,
}

impl PositionMap {
    pub(super) fn from_map(positions: BTreeMap<String, Point>) -> Self {
        Self { positions }
    }

    pub fn get(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(id, point)| (id.as_str(), *point))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScatterSummary {
    pub band: usize,
    pub clusters: usize,
    pub diffuse: usize,
    pub cluster_centers: usize,
}

impl ScatterSummary {
    pub fn total(&self) -> usize {
        self.band + self.clusters + self.diffuse
    }
}

/// Everything a run produces: the map plus the intermediate packing.
#[derive(Debug, Clone)]
pub struct Positions {
    pub map: PositionMap,
    pub components: Vec<Component>,
    pub packing: PackedLayout,
    pub isolated: Vec<String>,
    pub scatter: ScatterSummary,
    /// Components whose layout fell back to the circular arrangement.
    pub fallbacks: Vec<usize>,
}
