use std::cmp::Ordering;
use std::f64::consts::TAU;

use rand::Rng;

use crate::config::PackingConfig;

use super::{PackedLayout, Point};

/// Packs one circle per radius around the origin without overlap.
///
/// Greedy best-fit placement, recentering on the bounding box, then a
/// first-fit compaction pass. `rng` only decides the direction used when
/// greedy placement finds no valid candidate.
#[tracing::instrument(skip_all, fields(count = radii.len()))]
pub fn pack_circles<R: Rng + ?Sized>(
    radii: &[f64],
    config: &PackingConfig,
    rng: &mut R,
) -> PackedLayout {
    if radii.is_empty() {
        return PackedLayout::default();
    }
    let fallback_angle = rng.random_range(0.0..TAU);
    let order = placement_order(radii);

    let mut centers = place_greedy(radii, &order, config, fallback_angle);
    let outer_radius = recenter(&mut centers, radii);
    if radii.len() < config.compaction_limit {
        let moved = compact(&mut centers, radii, &order, config);
        tracing::debug!(moved, "compaction pass");
    } else {
        tracing::debug!(limit = config.compaction_limit, "compaction skipped");
    }

    PackedLayout {
        centers,
        radii: radii.to_vec(),
        outer_radius,
    }
}

/// Indices by radius, largest first; ties keep input order.
pub fn placement_order(radii: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..radii.len()).collect();
    order.sort_by(|&a, &b| {
        radii[b]
            .partial_cmp(&radii[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    order
}

/// `candidate` with radius `radius` keeps clear of every listed circle.
fn fits(
    candidate: Point,
    radius: f64,
    others: impl IntoIterator<Item = (Point, f64)>,
    epsilon: f64,
) -> bool {
    others.into_iter().all(|(center, other_radius)| {
        let min = (radius + other_radius - epsilon).max(0.0);
        candidate.distance_sq(center) >= min * min
    })
}

/// Phase 1. Every circle after the first is tangent to some placed circle,
/// choosing the valid tangent point nearest the origin.
pub fn place_greedy(
    radii: &[f64],
    order: &[usize],
    config: &PackingConfig,
    fallback_angle: f64,
) -> Vec<Point> {
    let mut centers = vec![Point::ORIGIN; radii.len()];
    let Some((&first, rest)) = order.split_first() else {
        return centers;
    };
    let mut placed = vec![first];
    let angles = config.placement_angles;

    for &i in rest {
        let r_i = radii[i];
        let mut best: Option<(f64, Point)> = None;

        for &j in &placed {
            let reach = r_i + radii[j];
            for step in 0..angles {
                let theta = TAU * step as f64 / angles as f64;
                let offset = Point::polar(reach, theta);
                let candidate = centers[j].offset(offset.x, offset.y);
                let clear = fits(
                    candidate,
                    r_i,
                    placed.iter().map(|&k| (centers[k], radii[k])),
                    config.epsilon,
                );
                if !clear {
                    continue;
                }
                let dist = candidate.norm();
                if best.is_none_or(|(best_dist, _)| dist < best_dist) {
                    best = Some((dist, candidate));
                }
            }
        }

        centers[i] = match best {
            Some((_, position)) => position,
            None => {
                let extent = placed
                    .iter()
                    .map(|&k| centers[k].norm() + radii[k])
                    .fold(0.0, f64::max);
                tracing::warn!(component = i, "no tangent slot found, placing outside");
                Point::polar(extent + r_i + config.fallback_gap, fallback_angle)
            }
        };
        placed.push(i);
    }

    centers
}

/// Phase 2. Centers the `center ± radius` bounding box on the origin and
/// returns half of its larger side.
pub fn recenter(centers: &mut [Point], radii: &[f64]) -> f64 {
    if centers.is_empty() {
        return 0.0;
    }
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for (center, radius) in centers.iter().zip(radii) {
        min_x = min_x.min(center.x - radius);
        min_y = min_y.min(center.y - radius);
        max_x = max_x.max(center.x + radius);
        max_y = max_y.max(center.y + radius);
    }
    let width = max_x - min_x;
    let height = max_y - min_y;
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;
    for center in centers.iter_mut() {
        *center = center.offset(-mid_x, -mid_y);
    }
    width.max(height) / 2.0
}

/// Phase 3. Pulls each circle toward the origin, taking the first clear
/// ring/angle candidate. Returns how many circles moved.
pub fn compact(
    centers: &mut [Point],
    radii: &[f64],
    order: &[usize],
    config: &PackingConfig,
) -> usize {
    let rings = config.compaction_rings;
    let angles = config.compaction_angles;
    let epsilon = config.epsilon;
    if rings == 0 || angles == 0 {
        return 0;
    }
    let mut moved = 0;

    for &i in order {
        let current = centers[i].norm();
        if current <= epsilon {
            continue;
        }
        let r_i = radii[i];
        let mut accepted = None;

        'search: for ring in 0..rings {
            let radius = epsilon + (current - epsilon) * ring as f64 / rings as f64;
            for step in 0..angles {
                let theta = TAU * step as f64 / angles as f64;
                let candidate = Point::polar(radius, theta);
                let others = centers
                    .iter()
                    .zip(radii)
                    .enumerate()
                    .filter(|(k, _)| *k != i)
                    .map(|(_, (center, radius))| (*center, *radius));
                if fits(candidate, r_i, others, epsilon) {
                    accepted = Some(candidate);
                    break 'search;
                }
            }
        }

        if let Some(candidate) = accepted {
            centers[i] = candidate;
            moved += 1;
        }
    }

    moved
}
