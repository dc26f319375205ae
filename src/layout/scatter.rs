use std::f64::consts::TAU;

use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Beta, Distribution, Exp1, StandardNormal};

use crate::config::ScatterConfig;

use super::{LayoutError, Point, ScatterSummary};

#[derive(Debug, Clone, Copy)]
struct Cluster {
    center: Point,
    radius: f64,
}

/// Band, cluster and halo group sizes for `count` isolated nodes.
pub fn group_sizes(count: usize, config: &ScatterConfig) -> ScatterSummary {
    let band = ((count as f64) * config.band_fraction).floor() as usize;
    let clusters = (((count as f64) * config.cluster_fraction).floor() as usize).min(count - band);
    ScatterSummary {
        band,
        clusters,
        diffuse: count - band - clusters,
        cluster_centers: 0,
    }
}

/// Procedural starfield placement for degree-zero nodes.
///
/// Structural choices (shuffle order, band orientation, cluster count and
/// centers) come from `discrete`; every per-node draw comes from
/// `continuous`. Nothing prevents isolated nodes from overlapping.
pub struct Starfield<'a, D: Rng + ?Sized, C: Rng + ?Sized> {
    config: &'a ScatterConfig,
    max_radius: f64,
    discrete: &'a mut D,
    continuous: &'a mut C,
}

impl<'a, D: Rng + ?Sized, C: Rng + ?Sized> Starfield<'a, D, C> {
    pub fn new(
        config: &'a ScatterConfig,
        max_radius: f64,
        discrete: &'a mut D,
        continuous: &'a mut C,
    ) -> Self {
        Self {
            config,
            max_radius,
            discrete,
            continuous,
        }
    }

    fn normal(&mut self, std_dev: f64) -> f64 {
        let z: f64 = self.continuous.sample(StandardNormal);
        z * std_dev
    }

    fn band(&mut self, ids: &[String], out: &mut Vec<(String, Point)>) -> Result<(), LayoutError> {
        if ids.is_empty() {
            return Ok(());
        }
        let shape = self.config.band_shape;
        let beta =
            Beta::new(shape, shape).map_err(|err| LayoutError::InvalidScatter(err.to_string()))?;
        let theta = self.discrete.random_range(0.0..TAU);
        let (sin, cos) = theta.sin_cos();
        let length = self.max_radius + self.config.band_margin;

        for id in ids {
            let t: f64 = beta.sample(&mut *self.continuous);
            let along = (t - 0.5) * 2.0 * length;
            let across = self.normal(self.config.band_width / 3.0);
            let point = Point::new(along * cos - across * sin, along * sin + across * cos);
            out.push((id.clone(), point));
        }
        Ok(())
    }

    fn cluster_centers(&mut self) -> Vec<Cluster> {
        let cfg = self.config;
        let count = self
            .discrete
            .random_range(cfg.cluster_count_min..=cfg.cluster_count_max.max(cfg.cluster_count_min))
            .max(1);
        let ring_min = self.max_radius + cfg.cluster_ring_min;
        let ring_max = (self.max_radius + cfg.cluster_ring_max).max(ring_min);
        let radius_max = cfg.cluster_radius_max.max(cfg.cluster_radius_min);
        (0..count)
            .map(|_| {
                let ring = self.discrete.random_range(ring_min..=ring_max);
                let angle = self.discrete.random_range(0.0..TAU);
                let radius = self
                    .discrete
                    .random_range(cfg.cluster_radius_min..=radius_max);
                Cluster {
                    center: Point::polar(ring, angle),
                    radius,
                }
            })
            .collect()
    }

    fn clusters(&mut self, ids: &[String], out: &mut Vec<(String, Point)>) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let clusters = self.cluster_centers();
        for (idx, id) in ids.iter().enumerate() {
            let cluster = clusters[idx % clusters.len()];
            let offset_radius = self.normal(cluster.radius / 2.0).abs();
            let offset_angle = self.continuous.random_range(0.0..TAU);
            let offset = Point::polar(offset_radius, offset_angle);
            out.push((id.clone(), cluster.center.offset(offset.x, offset.y)));
        }
        clusters.len()
    }

    fn halo(&mut self, ids: &[String], out: &mut Vec<(String, Point)>) {
        let cfg = self.config;
        for id in ids {
            let draw: f64 = self.continuous.sample(Exp1);
            let r_norm = (draw * cfg.halo_exponential_scale).min(cfg.halo_cap);
            let radius = self.max_radius + cfg.halo_offset + r_norm * cfg.halo_spread;
            let angle = self.continuous.random_range(0.0..TAU);
            out.push((id.clone(), Point::polar(radius, angle)));
        }
    }

    /// Shuffles `ids` and places them band first, then clusters, then halo.
    pub fn scatter(
        mut self,
        ids: &[String],
    ) -> Result<(Vec<(String, Point)>, ScatterSummary), LayoutError> {
        let mut order: Vec<String> = ids.to_vec();
        order.sort();
        order.shuffle(&mut *self.discrete);

        let mut summary = group_sizes(order.len(), self.config);
        let (band_ids, rest) = order.split_at(summary.band);
        let (cluster_ids, halo_ids) = rest.split_at(summary.clusters);

        let mut out = Vec::with_capacity(order.len());
        self.band(band_ids, &mut out)?;
        summary.cluster_centers = self.clusters(cluster_ids, &mut out);
        self.halo(halo_ids, &mut out);

        tracing::debug!(
            band = summary.band,
            clusters = summary.clusters,
            diffuse = summary.diffuse,
            cluster_centers = summary.cluster_centers,
            "scattered isolated nodes"
        );
        Ok((out, summary))
    }
}

/// Scatters `ids` around a connected mass of radius `max_radius`.
#[tracing::instrument(skip_all, fields(count = ids.len()))]
pub fn scatter_isolated<D: Rng + ?Sized, C: Rng + ?Sized>(
    ids: &[String],
    max_radius: f64,
    config: &ScatterConfig,
    discrete: &mut D,
    continuous: &mut C,
) -> Result<(Vec<(String, Point)>, ScatterSummary), LayoutError> {
    Starfield::new(config, max_radius, discrete, continuous).scatter(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("star{i}")).collect()
    }

    fn run(count: usize, max_radius: f64, seeds: (u64, u64)) -> (Vec<(String, Point)>, ScatterSummary) {
        let mut discrete = StdRng::seed_from_u64(seeds.0);
        let mut continuous = StdRng::seed_from_u64(seeds.1);
        scatter_isolated(
            &ids(count),
            max_radius,
            &ScatterConfig::default(),
            &mut discrete,
            &mut continuous,
        )
        .unwrap()
    }

    #[test]
    fn group_sizes_follow_floor_rule() {
        let config = ScatterConfig::default();
        for count in 0..200 {
            let sizes = group_sizes(count, &config);
            assert_eq!(sizes.band, (count as f64 * 0.4).floor() as usize);
            assert_eq!(sizes.clusters, (count as f64 * 0.3).floor() as usize);
            assert_eq!(sizes.total(), count);
        }
    }

    #[test]
    fn five_isolated_nodes_split_two_one_two() {
        let (points, summary) = run(5, 0.0, (1, 2));
        assert_eq!((summary.band, summary.clusters, summary.diffuse), (2, 1, 2));
        assert_eq!(points.len(), 5);
        for (_, point) in &points {
            assert!(point.norm() > 0.0);
        }
        assert!((5..=8).contains(&summary.cluster_centers));
    }

    #[test]
    fn every_id_is_placed_once() {
        let (points, _) = run(57, 1234.0, (3, 4));
        let mut placed: Vec<&str> = points.iter().map(|(id, _)| id.as_str()).collect();
        placed.sort();
        placed.dedup();
        assert_eq!(placed.len(), 57);
    }

    #[test]
    fn halo_and_clusters_stay_outside_the_mass() {
        let max_radius = 5000.0;
        let (points, summary) = run(100, max_radius, (5, 6));
        // band nodes come first, then clusters, then halo
        let halo = &points[summary.band + summary.clusters..];
        for (_, point) in halo {
            let r = point.norm();
            assert!(r >= max_radius + 2000.0 - 1e-9);
            assert!(r <= max_radius + 2000.0 + 5.0 * 4000.0 + 1e-9);
        }
        assert_eq!(halo.len(), 30);
    }

    #[test]
    fn band_is_bounded_along_its_axis() {
        let (points, summary) = run(200, 0.0, (7, 8));
        for (_, point) in &points[..summary.band] {
            // |along| <= band length, |across| is a few band widths at most
            assert!(point.norm() <= 20000.0 + 4000.0 * 3.0);
        }
    }

    #[test]
    fn seeded_scatter_is_reproducible() {
        let a = run(40, 800.0, (9, 10));
        let b = run(40, 800.0, (9, 10));
        assert_eq!(a.0, b.0);
        let c = run(40, 800.0, (9, 11));
        assert_ne!(a.0, c.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut reversed = ids(25);
        reversed.reverse();
        let config = ScatterConfig::default();
        let (a, _) = scatter_isolated(
            &ids(25),
            0.0,
            &config,
            &mut StdRng::seed_from_u64(1),
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap();
        let (b, _) = scatter_isolated(
            &reversed,
            0.0,
            &config,
            &mut StdRng::seed_from_u64(1),
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
