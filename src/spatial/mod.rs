//! Range queries over medial point sets.
//!
//! Two structurally independent implementations answer the same question:
//!
//! - [`BruteForce`] - a linear scan, the reference answer
//! - [`KdTree`] - a randomized 2D partitioning tree with per-node bounds
//!
//! Both borrow the point slice and return indices into it, sorted ascending,
//! so their results can be compared directly.

mod brute;
mod kdtree;

pub use brute::{nearest_index, BruteForce};
pub use kdtree::KdTree;

use crate::bounds::Aabb2;

/// Answers axis-aligned rectangle queries over a fixed point set.
pub trait PointsInRect<F> {
    /// Returns the indices of all stored points inside `rect`, boundary
    /// included, in ascending order.
    fn points_in_rect(&self, rect: Aabb2<F>) -> Vec<usize>;
}
