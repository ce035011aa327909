//! Proximity graph construction with an expanding search window.

use super::WeightedGraph;
use crate::bounds::Aabb2;
use crate::params::{DEFAULT_MIN_NEIGHBORS, DEFAULT_PROXIMITY_THRESHOLD, DEFAULT_SEARCH_GROWTH};
use crate::primitives::Point2;
use crate::spatial::PointsInRect;
use tracing::debug;

/// Settings for the per-point neighbor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSearch {
    /// Half-width of the first search window.
    pub radius: f64,
    /// Factor applied to the half-width after each unsuccessful search.
    pub growth: f64,
    /// Number of other points the window must contain.
    pub min_neighbors: usize,
}

impl Default for NeighborSearch {
    fn default() -> Self {
        Self {
            radius: DEFAULT_PROXIMITY_THRESHOLD,
            growth: DEFAULT_SEARCH_GROWTH,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
        }
    }
}

/// Links every point to all other points in its smallest sufficient window.
///
/// For each point a square window centered on it starts at half-width
/// `search.radius` and grows by `search.growth` until it holds at least
/// `search.min_neighbors` other points (or every other point, for tiny sets).
/// A directed edge weighted by Euclidean distance goes to each of them.
pub fn build_proximity_graph<I>(points: &[Point2<f64>], index: &I, search: NeighborSearch) -> WeightedGraph
where
    I: PointsInRect<f64> + ?Sized,
{
    let n = points.len();
    let mut graph = WeightedGraph::new(n);
    let Some(all) = Aabb2::from_points(points.iter().copied()) else {
        return graph;
    };
    let required = search.min_neighbors.min(n - 1);

    let mut widest = 0.0_f64;
    for (i, &p) in points.iter().enumerate() {
        let mut radius = search.radius;
        let neighbors = loop {
            let window = Aabb2::around(p, radius);
            let found: Vec<usize> = index
                .points_in_rect(window)
                .into_iter()
                .filter(|&j| j != i)
                .collect();

            let exhausted = window.contains(all) || !radius.is_finite();
            if found.len() >= required || exhausted {
                break found;
            }
            radius *= search.growth;
        };
        widest = widest.max(radius);

        for j in neighbors {
            graph.add_edge(i, j, p.distance(points[j]));
        }
    }

    debug!(
        nodes = n,
        edges = graph.edge_count(),
        widest_window = widest,
        "built proximity graph"
    );
    graph
}
