//! Local-maximum ridge detector.

use crate::distance::DistanceField;
use crate::primitives::Point2;
use crate::raster::OccupancyGrid;

const NEIGHBORHOOD: [(isize, isize); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Collects the occupied cells that sit on a ridge of the distance field.
///
/// A cell qualifies when all nine cells of its 3x3 neighborhood are inside
/// the occupied region and at least `min_count` of them (the center included)
/// have a distance no greater than the center's. Cells are visited in
/// row-major order and returned as their lattice coordinates.
///
/// Flat ridges are kept: equal distances count towards `min_count`.
pub fn extract_ridge_points(
    occupancy: &OccupancyGrid,
    field: &DistanceField,
    min_count: usize,
) -> Vec<Point2<f64>> {
    if !field.has_size(occupancy.width(), occupancy.height()) {
        return Vec::new();
    }

    let mut ridge = Vec::new();
    for (x, y, &inside) in occupancy.iter() {
        if !inside {
            continue;
        }
        let (cx, cy) = (x as isize, y as isize);
        let center = field[(x, y)];

        let mut not_above = 0;
        let mut interior = true;
        for (dx, dy) in NEIGHBORHOOD {
            if occupancy.get(cx + dx, cy + dy) != Some(&true) {
                interior = false;
                break;
            }
            if field.get(cx + dx, cy + dy).is_some_and(|&d| d <= center) {
                not_above += 1;
            }
        }

        if interior && not_above >= min_count {
            ridge.push(Point2::new(x as f64, y as f64));
        }
    }
    ridge
}
