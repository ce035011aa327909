//! Fixed-resolution rasters over the curve domain.
//!
//! Grid cell `(x, y)` stands for the lattice point `(x, y)` in grid
//! coordinates: polygons are sampled there and curves are stamped onto the
//! nearest lattice point.

mod fill;
mod grid;
mod mapping;

pub use fill::{polygon_contains, polygon_signed_area, rasterize_polygon, stamp_polyline};
pub use grid::{Grid, OccupancyGrid};
pub use mapping::GridTransform;
