use std::collections::VecDeque;
use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::component::{LayoutAttempt, LayoutFailure};
use super::Point;

/// Stress majorization over graph-theoretic distances, using localized
/// weighted updates (`w_ij = d_ij^-2`). Coordinates are in distance units;
/// the caller rescales them into the component's circle.
pub(super) struct StressMajorization<'a> {
    size: usize,
    edges: &'a [(usize, usize)],
    max_iterations: usize,
    tolerance: f64,
    rng: StdRng,
}

impl<'a> StressMajorization<'a> {
    pub(super) fn new(
        size: usize,
        edges: &'a [(usize, usize)],
        max_iterations: usize,
        tolerance: f64,
        seed: u64,
    ) -> Self {
        Self {
            size,
            edges,
            max_iterations,
            tolerance,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// All-pairs hop counts. `None` if some pair is unreachable.
    fn shortest_paths(&self) -> Option<Vec<Vec<f64>>> {
        let mut adjacency = vec![Vec::new(); self.size];
        for &(a, b) in self.edges {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }

        let mut distances = vec![vec![f64::INFINITY; self.size]; self.size];
        let mut queue = VecDeque::new();
        for source in 0..self.size {
            let row = &mut distances[source];
            row[source] = 0.0;
            queue.clear();
            queue.push_back(source);
            while let Some(cur) = queue.pop_front() {
                let next_dist = row[cur] + 1.0;
                for &next in &adjacency[cur] {
                    if row[next].is_infinite() {
                        row[next] = next_dist;
                        queue.push_back(next);
                    }
                }
            }
            if row.iter().any(|d| d.is_infinite()) {
                return None;
            }
        }
        Some(distances)
    }

    /// Circle sized to the graph diameter, with a little seeded jitter so
    /// symmetric graphs do not start in a saddle.
    fn initial_layout(&mut self, diameter: f64) -> Vec<Point> {
        let radius = (diameter / 2.0).max(1.0);
        (0..self.size)
            .map(|i| {
                let angle = TAU * i as f64 / self.size as f64;
                let jitter_x = self.rng.random_range(-0.05..0.05);
                let jitter_y = self.rng.random_range(-0.05..0.05);
                Point::polar(radius, angle).offset(jitter_x, jitter_y)
            })
            .collect()
    }

    fn stress(positions: &[Point], distances: &[Vec<f64>]) -> f64 {
        let mut total = 0.0;
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let target = distances[i][j];
                let diff = positions[i].distance(positions[j]) - target;
                total += diff * diff / (target * target);
            }
        }
        total
    }

    pub(super) fn run(mut self) -> LayoutAttempt {
        if self.size == 0 {
            return LayoutAttempt::Laid(Vec::new());
        }
        if self.size == 1 {
            return LayoutAttempt::Laid(vec![Point::ORIGIN]);
        }
        let Some(distances) = self.shortest_paths() else {
            return LayoutAttempt::Failed(LayoutFailure::Disconnected);
        };
        let diameter = distances
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f64::max);
        let mut positions = self.initial_layout(diameter);
        let mut prev = Self::stress(&positions, &distances);
        let mut best = (prev, positions.clone());

        for iteration in 0..self.max_iterations {
            for i in 0..self.size {
                let current = positions[i];
                let mut sum_x = 0.0;
                let mut sum_y = 0.0;
                let mut weight_total = 0.0;
                for (j, other) in positions.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let target = distances[i][j];
                    let weight = 1.0 / (target * target);
                    let dist = current.distance(*other).max(1e-9);
                    sum_x += weight * (other.x + target * (current.x - other.x) / dist);
                    sum_y += weight * (other.y + target * (current.y - other.y) / dist);
                    weight_total += weight;
                }
                positions[i] = Point::new(sum_x / weight_total, sum_y / weight_total);
            }

            let stress = Self::stress(&positions, &distances);
            if !stress.is_finite() {
                return LayoutAttempt::Failed(LayoutFailure::NonFinite);
            }
            if prev <= f64::EPSILON || (prev - stress).abs() / prev < self.tolerance {
                tracing::trace!(iteration, stress, "stress converged");
                return LayoutAttempt::Laid(positions);
            }
            if stress < best.0 {
                best = (stress, positions.clone());
            }
            prev = stress;
        }

        // paths and small stars flatten toward a line slowly; keep the best seen
        tracing::debug!(
            iterations = self.max_iterations,
            stress = best.0,
            "stress iteration budget exhausted"
        );
        LayoutAttempt::Laid(best.1)
    }
}
