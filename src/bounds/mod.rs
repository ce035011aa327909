//! Bounding rectangles used for range queries and pruning.

mod aabb;

pub use aabb::Aabb2;
