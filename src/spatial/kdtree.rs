//! Randomized KD-tree for rectangle queries.
//!
//! The tree recursively splits the point set on alternating axes at a pivot
//! drawn at random from the current subset. Points equal to the pivot on the
//! split axis stay at the node; smaller and larger points go to the two
//! children. Every node records the bounds of its subtree so whole branches
//! can be skipped or accepted without testing individual points.
//!
//! The pivot sequence comes from a seeded generator, so the same points and
//! seed always give the same tree.
//!
//! # Example
//!
//! ```
//! use gencyl::bounds::Aabb2;
//! use gencyl::spatial::{KdTree, PointsInRect};
//! use gencyl::Point2;
//!
//! let points: Vec<Point2<f64>> = (0..100)
//!     .map(|i| Point2::new((i % 10) as f64, (i / 10) as f64))
//!     .collect();
//!
//! let tree = KdTree::build(&points, 10, 42);
//! let window = Aabb2::new(Point2::new(2.0, 2.0), Point2::new(3.0, 3.0));
//! assert_eq!(tree.points_in_rect(window), vec![22, 23, 32, 33]);
//! ```

use super::PointsInRect;
use crate::bounds::Aabb2;
use crate::primitives::Point2;
use num_traits::Float;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A node in the KD-tree.
#[derive(Debug, Clone)]
enum KdNode<F> {
    /// A small set of points stored without further splitting.
    Leaf {
        indices: Vec<usize>,
        bounds: Aabb2<F>,
    },
    /// A split along one axis.
    Internal {
        /// Points whose coordinate on the split axis equals the pivot's.
        indices: Vec<usize>,
        /// The axis along which this node splits (0 = x, 1 = y).
        axis: u8,
        /// Pivot coordinate on the split axis.
        split: F,
        /// Bounds of every point in this subtree.
        bounds: Aabb2<F>,
        /// Points with a smaller coordinate on the split axis.
        left: Option<Box<KdNode<F>>>,
        /// Points with a larger coordinate on the split axis.
        right: Option<Box<KdNode<F>>>,
    },
}

impl<F> KdNode<F> {
    fn bounds(&self) -> &Aabb2<F> {
        match self {
            Self::Leaf { bounds, .. } | Self::Internal { bounds, .. } => bounds,
        }
    }
}

/// A 2D KD-tree over a borrowed point slice.
///
/// # Complexity
///
/// - Construction: O(n log n) expected
/// - Range query: O(√n + k) expected, where k is the number of results
#[derive(Debug, Clone)]
pub struct KdTree<'a, F> {
    points: &'a [Point2<F>],
    root: Option<Box<KdNode<F>>>,
}

impl<'a, F: Float> KdTree<'a, F> {
    /// Builds a tree whose nodes with fewer than `leaf_size` points are leaves.
    ///
    /// `seed` drives pivot selection. Returns an empty tree if the input is
    /// empty.
    pub fn build(points: &'a [Point2<F>], leaf_size: usize, seed: u64) -> Self {
        if points.is_empty() {
            return KdTree { points, root: None };
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let indices: Vec<usize> = (0..points.len()).collect();
        let root = Self::build_recursive(points, indices, 0, leaf_size, &mut rng);

        KdTree {
            points,
            root: Some(root),
        }
    }

    /// Recursively builds the tree from a non-empty index set.
    fn build_recursive(
        points: &[Point2<F>],
        indices: Vec<usize>,
        depth: usize,
        leaf_size: usize,
        rng: &mut StdRng,
    ) -> Box<KdNode<F>> {
        let bounds = subset_bounds(points, &indices);

        if indices.len() < leaf_size {
            return Box::new(KdNode::Leaf { indices, bounds });
        }

        let axis = (depth % 2) as u8;
        let coord = |i: usize| if axis == 0 { points[i].x } else { points[i].y };

        let pivot = coord(indices[rng.gen_range(0..indices.len())]);

        let mut smaller = Vec::new();
        let mut equal = Vec::new();
        let mut larger = Vec::new();
        for i in indices {
            let value = coord(i);
            if value < pivot {
                smaller.push(i);
            } else if value > pivot {
                larger.push(i);
            } else {
                equal.push(i);
            }
        }

        let mut child = |subset: Vec<usize>| {
            if subset.is_empty() {
                None
            } else {
                Some(Self::build_recursive(points, subset, depth + 1, leaf_size, rng))
            }
        };
        let left = child(smaller);
        let right = child(larger);

        Box::new(KdNode::Internal {
            indices: equal,
            axis,
            split: pivot,
            bounds,
            left,
            right,
        })
    }

    /// Returns the number of points in the tree.
    pub fn len(&self) -> usize {
        if self.root.is_some() {
            self.points.len()
        } else {
            0
        }
    }

    /// Returns true if the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the depth of the deepest node, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        fn node_depth<F>(node: &KdNode<F>) -> usize {
            match node {
                KdNode::Leaf { .. } => 1,
                KdNode::Internal { left, right, .. } => {
                    let l = left.as_deref().map_or(0, node_depth);
                    let r = right.as_deref().map_or(0, node_depth);
                    1 + l.max(r)
                }
            }
        }
        self.root.as_deref().map_or(0, node_depth)
    }

    /// Recursive rectangle search.
    fn rect_recursive(&self, node: &KdNode<F>, rect: Aabb2<F>, results: &mut Vec<usize>) {
        let bounds = *node.bounds();
        if !rect.intersects(bounds) {
            return;
        }
        if rect.contains(bounds) {
            collect_subtree(node, results);
            return;
        }

        match node {
            KdNode::Leaf { indices, .. } => {
                results.extend(
                    indices
                        .iter()
                        .copied()
                        .filter(|&i| rect.contains_point(self.points[i])),
                );
            }
            KdNode::Internal {
                indices,
                axis,
                split,
                left,
                right,
                ..
            } => {
                let (lo, hi) = if *axis == 0 {
                    (rect.min.x, rect.max.x)
                } else {
                    (rect.min.y, rect.max.y)
                };

                // Pivot-equal points only matter when the rect spans the split
                if lo <= *split && *split <= hi {
                    results.extend(
                        indices
                            .iter()
                            .copied()
                            .filter(|&i| rect.contains_point(self.points[i])),
                    );
                }
                if lo < *split {
                    if let Some(child) = left {
                        self.rect_recursive(child, rect, results);
                    }
                }
                if hi > *split {
                    if let Some(child) = right {
                        self.rect_recursive(child, rect, results);
                    }
                }
            }
        }
    }
}

impl<F: Float> PointsInRect<F> for KdTree<'_, F> {
    fn points_in_rect(&self, rect: Aabb2<F>) -> Vec<usize> {
        let mut results = Vec::new();
        if let Some(root) = &self.root {
            self.rect_recursive(root, rect, &mut results);
        }
        results.sort_unstable();
        results
    }
}

/// Appends every index stored under `node`.
fn collect_subtree<F>(node: &KdNode<F>, results: &mut Vec<usize>) {
    match node {
        KdNode::Leaf { indices, .. } => results.extend_from_slice(indices),
        KdNode::Internal {
            indices,
            left,
            right,
            ..
        } => {
            results.extend_from_slice(indices);
            if let Some(child) = left {
                collect_subtree(child, results);
            }
            if let Some(child) = right {
                collect_subtree(child, results);
            }
        }
    }
}

fn subset_bounds<F: Float>(points: &[Point2<F>], indices: &[usize]) -> Aabb2<F> {
    let first = points[indices[0]];
    indices[1..]
        .iter()
        .fold(Aabb2::from_point(first), |b, &i| b.expand_to_include(points[i]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::BruteForce;

    fn sample_points() -> Vec<Point2<f64>> {
        vec![
            Point2::new(2.0, 3.0),
            Point2::new(5.0, 4.0),
            Point2::new(9.0, 6.0),
            Point2::new(4.0, 7.0),
            Point2::new(8.0, 1.0),
            Point2::new(7.0, 2.0),
        ]
    }

    fn scattered(n: usize) -> Vec<Point2<f64>> {
        (0..n)
            .map(|i| Point2::new((i * 7 % 100) as f64 * 0.5, (i * 13 % 97) as f64 * 0.5))
            .collect()
    }

    #[test]
    fn test_build_empty() {
        let points: Vec<Point2<f64>> = vec![];
        let tree = KdTree::build(&points, 10, 0);
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        let rect = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        assert!(tree.points_in_rect(rect).is_empty());
    }

    #[test]
    fn test_small_set_is_single_leaf() {
        let points = sample_points();
        let tree = KdTree::build(&points, 10, 0);
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_within_rect_some() {
        let points = sample_points();
        let tree = KdTree::build(&points, 2, 3);

        let rect = Aabb2::new(Point2::new(1.0, 1.0), Point2::new(6.0, 5.0));
        assert_eq!(tree.points_in_rect(rect), vec![0, 1]);
    }

    #[test]
    fn test_within_rect_all() {
        let points = sample_points();
        let tree = KdTree::build(&points, 1, 9);

        let rect = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(20.0, 20.0));
        assert_eq!(tree.points_in_rect(rect), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_matches_brute_force() {
        let points = scattered(500);
        let brute = BruteForce::new(&points);

        for seed in [0, 1, 7] {
            let tree = KdTree::build(&points, 10, seed);
            assert!(tree.depth() > 1);
            for (cx, cy, r) in [(10.0, 10.0, 3.0), (25.0, 40.0, 8.5), (0.0, 0.0, 1.0), (30.0, 30.0, 100.0)] {
                let rect = Aabb2::around(Point2::new(cx, cy), r);
                assert_eq!(tree.points_in_rect(rect), brute.points_in_rect(rect));
            }
        }
    }

    #[test]
    fn test_rect_edges_on_split_lines() {
        // Every coordinate is an integer, so pivots and rect edges coincide.
        let points: Vec<Point2<f64>> = (0..400)
            .map(|i| Point2::new((i % 20) as f64, (i / 20) as f64))
            .collect();
        let brute = BruteForce::new(&points);

        for seed in [3, 4] {
            let tree = KdTree::build(&points, 2, seed);
            for (x0, y0, x1, y1) in [(5.0, 5.0, 5.0, 5.0), (0.0, 7.0, 19.0, 7.0), (4.0, 0.0, 9.0, 19.0), (-1.0, -1.0, 0.0, 0.0)] {
                let rect = Aabb2::new(Point2::new(x0, y0), Point2::new(x1, y1));
                assert_eq!(tree.points_in_rect(rect), brute.points_in_rect(rect));
            }
        }
        let tree = KdTree::build(&points, 2, 3);
        let line = Aabb2::new(Point2::new(0.0, 7.0), Point2::new(19.0, 7.0));
        assert_eq!(tree.points_in_rect(line).len(), 20);
    }

    #[test]
    fn test_same_seed_same_tree() {
        let points = scattered(300);
        let a = KdTree::build(&points, 4, 11);
        let b = KdTree::build(&points, 4, 11);
        assert_eq!(a.depth(), b.depth());
    }

    #[test]
    fn test_duplicate_points() {
        let points = vec![Point2::new(1.0, 1.0); 40];
        let tree = KdTree::build(&points, 10, 5);

        let rect = Aabb2::around(Point2::new(1.0, 1.0), 0.5);
        assert_eq!(tree.points_in_rect(rect).len(), 40);
        let rect = Aabb2::around(Point2::new(3.0, 3.0), 0.5);
        assert!(tree.points_in_rect(rect).is_empty());
    }

    #[test]
    fn test_collinear_points() {
        let points: Vec<Point2<f64>> = (0..50).map(|i| Point2::new(i as f64, 0.0)).collect();
        let tree = KdTree::build(&points, 3, 2);

        let rect = Aabb2::new(Point2::new(9.5, -1.0), Point2::new(12.0, 1.0));
        assert_eq!(tree.points_in_rect(rect), vec![10, 11, 12]);
    }

    #[test]
    fn test_f32_support() {
        let points: Vec<Point2<f32>> = vec![
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 4.0),
            Point2::new(5.0, 6.0),
        ];
        let tree = KdTree::build(&points, 1, 0);
        let rect = Aabb2::around(Point2::new(3.0, 4.0), 0.5);
        assert_eq!(tree.points_in_rect(rect), vec![1]);
    }
}
