//! Ridge extraction from the distance field and proximity clustering.

mod cluster;
mod ridge;

pub use cluster::{largest_cluster, proximity_clusters, UnionFind};
pub use ridge::extract_ridge_points;
