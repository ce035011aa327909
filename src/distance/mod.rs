//! Chamfer distance fields over the raster grid.

mod transform;

pub use transform::{chamfer_distance_transform, combined_distance_field, curve_distance_field};

use crate::raster::Grid;

/// Per-cell approximate distance to the nearest seed cell, in grid units.
pub type DistanceField = Grid<f64>;
