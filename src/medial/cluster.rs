//! Proximity clustering of medial points.

use crate::primitives::Point2;
use tracing::{debug, warn};

/// Disjoint-set forest with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    /// Creates `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Returns the representative of the set containing `x`.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]]; // Path compression
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets containing `a` and `b`.
    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        // Union by rank
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Groups points whose pairwise distance chain stays within `threshold`.
///
/// Every pair is compared, so this is quadratic in the number of points.
/// Each group lists point indices in increasing order and groups are ordered
/// by their smallest index, which makes the partition fully deterministic.
pub fn proximity_clusters(points: &[Point2<f64>], threshold: f64) -> Vec<Vec<usize>> {
    let n = points.len();
    let threshold_sq = threshold * threshold;

    let mut sets = UnionFind::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if points[i].distance_squared(points[j]) <= threshold_sq {
                sets.union(i, j);
            }
        }
    }

    // Slot per representative, allocated when its first (smallest) member shows up.
    let mut slot_of_root = vec![usize::MAX; n];
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = sets.find(i);
        if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = clusters.len();
            clusters.push(Vec::new());
        }
        clusters[slot_of_root[root]].push(i);
    }
    clusters
}

/// Keeps only the largest proximity cluster, preserving input order.
///
/// When several clusters share the largest size, the one containing the
/// smallest point index wins.
pub fn largest_cluster(points: &[Point2<f64>], threshold: f64) -> Vec<Point2<f64>> {
    let clusters = proximity_clusters(points, threshold);

    let Some(best_len) = clusters.iter().map(Vec::len).max() else {
        return Vec::new();
    };
    let tied = clusters.iter().filter(|c| c.len() == best_len).count();
    if tied > 1 {
        warn!(
            clusters = tied,
            size = best_len,
            "largest medial clusters tie, keeping the one with the lowest index"
        );
    }

    debug!(
        points = points.len(),
        clusters = clusters.len(),
        kept = best_len,
        "filtered medial points"
    );

    clusters
        .into_iter()
        .find(|c| c.len() == best_len)
        .map(|c| c.into_iter().map(|i| points[i]).collect())
        .unwrap_or_default()
}
