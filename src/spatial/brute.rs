//! Linear-scan range queries.

use super::PointsInRect;
use crate::bounds::Aabb2;
use crate::primitives::Point2;
use num_traits::Float;

/// Tests every point against the query rectangle.
#[derive(Debug, Clone, Copy)]
pub struct BruteForce<'a, F> {
    points: &'a [Point2<F>],
}

impl<'a, F: Float> BruteForce<'a, F> {
    /// Wraps a point slice.
    pub fn new(points: &'a [Point2<F>]) -> Self {
        Self { points }
    }

    /// Returns the number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if no points are indexed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl<F: Float> PointsInRect<F> for BruteForce<'_, F> {
    fn points_in_rect(&self, rect: Aabb2<F>) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|&(_, &p)| rect.contains_point(p))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Index of the point closest to `query` by squared distance.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
pub fn nearest_index<F: Float>(points: &[Point2<F>], query: Point2<F>) -> Option<usize> {
    let mut best: Option<(usize, F)> = None;
    for (i, &p) in points.iter().enumerate() {
        let d = p.distance_squared(query);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}
