use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::component::{LayoutAttempt, LayoutFailure};
use super::Point;

const MIN_DISTANCE: f64 = 0.01;
const MOVE_THRESHOLD: f64 = 1e-4;

/// Fruchterman-Reingold placement in the unit square: pairwise repulsion
/// `k²/d`, attraction `d²/k` along edges, linear cooling.
pub(super) struct ForceDirected<'a> {
    size: usize,
    edges: &'a [(usize, usize)],
    k: f64,
    iterations: usize,
    rng: StdRng,
}

impl<'a> ForceDirected<'a> {
    pub(super) fn new(
        size: usize,
        edges: &'a [(usize, usize)],
        k: f64,
        iterations: usize,
        seed: u64,
    ) -> Self {
        Self {
            size,
            edges,
            k,
            iterations,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn random_layout(&mut self) -> Vec<Point> {
        (0..self.size)
            .map(|_| Point::new(self.rng.random::<f64>(), self.rng.random::<f64>()))
            .collect()
    }

    fn initial_temperature(positions: &[Point]) -> f64 {
        let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
        let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
        for pos in positions {
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x);
            max_y = max_y.max(pos.y);
        }
        (max_x - min_x).max(max_y - min_y) * 0.1
    }

    pub(super) fn run(mut self) -> LayoutAttempt {
        if self.size <= 1 {
            return LayoutAttempt::Laid(vec![Point::ORIGIN; self.size]);
        }
        let mut positions = self.random_layout();
        let k = self.k;
        let k_sq = k * k;
        let mut temperature = Self::initial_temperature(&positions);
        let cooling = temperature / (self.iterations as f64 + 1.0);
        let mut displacement = vec![Point::ORIGIN; self.size];

        for iteration in 0..self.iterations {
            displacement.fill(Point::ORIGIN);

            // O(n^2) repulsion between every pair
            for i in 0..self.size {
                let pos_i = positions[i];
                for j in (i + 1)..self.size {
                    let dx = pos_i.x - positions[j].x;
                    let dy = pos_i.y - positions[j].y;
                    let dist_sq = (dx * dx + dy * dy).max(MIN_DISTANCE * MIN_DISTANCE);
                    let f = k_sq / dist_sq;
                    displacement[i] = displacement[i].offset(dx * f, dy * f);
                    displacement[j] = displacement[j].offset(-dx * f, -dy * f);
                }
            }

            for &(a, b) in self.edges {
                let dx = positions[a].x - positions[b].x;
                let dy = positions[a].y - positions[b].y;
                let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let f = dist / k;
                displacement[a] = displacement[a].offset(-dx * f, -dy * f);
                displacement[b] = displacement[b].offset(dx * f, dy * f);
            }

            let mut moved = 0.0;
            for (pos, disp) in positions.iter_mut().zip(&displacement) {
                let length = disp.norm().max(MIN_DISTANCE);
                let step = disp.scale(temperature / length);
                *pos = pos.offset(step.x, step.y);
                moved += step.norm();
            }
            if !moved.is_finite() {
                return LayoutAttempt::Failed(LayoutFailure::NonFinite);
            }

            temperature -= cooling;
            if moved / (self.size as f64) < MOVE_THRESHOLD {
                tracing::trace!(iteration, "force layout settled");
                break;
            }
        }

        LayoutAttempt::Laid(positions)
    }
}
