use std::f64::consts::TAU;

use thiserror::Error;

use crate::config::ComponentLayoutConfig;

use super::force::ForceDirected;
use super::stress::StressMajorization;
use super::{Component, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAlgorithm {
    Single,
    Stress,
    ForceDirected { iterations: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutFailure {
    #[error("layout produced non-finite coordinates")]
    NonFinite,
    #[error("component is not connected")]
    Disconnected,
}

/// Outcome of one layout algorithm run, in the algorithm's own units.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutAttempt {
    Laid(Vec<Point>),
    Failed(LayoutFailure),
}

/// Node coordinates for one component, in component node order.
#[derive(Debug, Clone)]
pub struct ComponentPlacement {
    pub index: usize,
    pub positions: Vec<(String, Point)>,
    pub algorithm: LayoutAlgorithm,
    pub fallback: Option<LayoutFailure>,
}

pub fn choose_algorithm(size: usize, config: &ComponentLayoutConfig) -> LayoutAlgorithm {
    if size <= 1 {
        LayoutAlgorithm::Single
    } else if size < config.stress_threshold {
        LayoutAlgorithm::Stress
    } else {
        LayoutAlgorithm::ForceDirected {
            iterations: config.force_iterations(size),
        }
    }
}

/// Runs the chosen algorithm and fits the result into the circle of
/// `radius` around `center`.
pub fn attempt_layout(
    component: &Component,
    algorithm: LayoutAlgorithm,
    center: Point,
    radius: f64,
    config: &ComponentLayoutConfig,
) -> LayoutAttempt {
    let size = component.size();
    let (raw, scale) = match algorithm {
        LayoutAlgorithm::Single => return LayoutAttempt::Laid(vec![center; size]),
        LayoutAlgorithm::Stress => (
            StressMajorization::new(
                size,
                &component.edges,
                config.stress_max_iterations,
                config.stress_tolerance,
                config.seed,
            )
            .run(),
            radius * config.stress_scale,
        ),
        LayoutAlgorithm::ForceDirected { iterations } => {
            let k = config.force_k / (size as f64).sqrt();
            (
                ForceDirected::new(size, &component.edges, k, iterations, config.seed).run(),
                radius * config.force_scale,
            )
        }
    };

    match raw {
        LayoutAttempt::Laid(points) => {
            let fitted = rescale(&points, center, scale);
            if fitted.iter().all(|point| point.is_finite()) {
                LayoutAttempt::Laid(fitted)
            } else {
                LayoutAttempt::Failed(LayoutFailure::NonFinite)
            }
        }
        failed => failed,
    }
}

/// Centers `points` on their mean and scales so the largest absolute
/// coordinate equals `scale`, then moves them to `center`.
pub fn rescale(points: &[Point], center: Point, scale: f64) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }
    let count = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / count;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / count;
    let limit = points
        .iter()
        .map(|p| (p.x - mean_x).abs().max((p.y - mean_y).abs()))
        .fold(0.0, f64::max);
    let factor = if limit > 0.0 { scale / limit } else { 0.0 };
    points
        .iter()
        .map(|p| Point::new(center.x + (p.x - mean_x) * factor, center.y + (p.y - mean_y) * factor))
        .collect()
}

/// Evenly spaced points on the circle boundary; a single node sits at the center.
pub fn circular_layout(size: usize, center: Point, radius: f64) -> Vec<Point> {
    if size == 1 {
        return vec![center];
    }
    (0..size)
        .map(|i| {
            let offset = Point::polar(radius, TAU * i as f64 / size as f64);
            center.offset(offset.x, offset.y)
        })
        .collect()
}

/// Lays out one component inside its assigned circle. Never fails: a
/// failed attempt is replaced by the circular arrangement.
pub fn layout_component(
    component: &Component,
    center: Point,
    radius: f64,
    config: &ComponentLayoutConfig,
) -> ComponentPlacement {
    let algorithm = choose_algorithm(component.size(), config);
    let (points, fallback) = match attempt_layout(component, algorithm, center, radius, config) {
        LayoutAttempt::Laid(points) => (points, None),
        LayoutAttempt::Failed(reason) => {
            tracing::warn!(
                component = component.index,
                size = component.size(),
                %reason,
                "layout failed, using circular arrangement"
            );
            (circular_layout(component.size(), center, radius), Some(reason))
        }
    };

    ComponentPlacement {
        index: component.index,
        positions: component.nodes.iter().cloned().zip(points).collect(),
        algorithm,
        fallback,
    }
}
