//! Polygon scan conversion and polyline stamping.

use super::grid::{Grid, OccupancyGrid};
use crate::primitives::Point2;

/// Scan-converts a simple polygon into a `width x height` occupancy grid.
///
/// Each cell `(x, y)` is occupied when the lattice point `(x, y)` lies inside
/// the polygon under the even-odd rule. The edge test is half-open in `y`
/// (the same convention as [`polygon_contains`]), so every cell agrees with a
/// point-in-polygon query at its lattice point.
///
/// Polygons with fewer than 3 vertices occupy nothing. Self-intersecting
/// input is not rejected; it produces whatever the even-odd rule yields.
///
/// # Example
///
/// ```
/// use gencyl::raster::rasterize_polygon;
/// use gencyl::Point2;
///
/// let square = [
///     Point2::new(2.0, 2.0),
///     Point2::new(6.0, 2.0),
///     Point2::new(6.0, 6.0),
///     Point2::new(2.0, 6.0),
/// ];
/// let grid = rasterize_polygon(&square, 10, 10);
/// assert_eq!(grid.count_occupied(), 16);
/// ```
pub fn rasterize_polygon(vertices: &[Point2<f64>], width: usize, height: usize) -> OccupancyGrid {
    let mut grid = OccupancyGrid::filled(width, height, false);
    if vertices.len() < 3 || width == 0 {
        return grid;
    }

    let n = vertices.len();
    let mut crossings: Vec<f64> = Vec::with_capacity(n);

    for y in 0..height {
        let yf = y as f64;
        crossings.clear();

        let mut j = n - 1;
        for i in 0..n {
            let vi = vertices[i];
            let vj = vertices[j];
            if (vi.y > yf) != (vj.y > yf) {
                crossings.push((vj.x - vi.x) * (yf - vi.y) / (vj.y - vi.y) + vi.x);
            }
            j = i;
        }

        crossings.sort_by(f64::total_cmp);

        // Lattice points with crossings[2k] <= x < crossings[2k + 1] are inside.
        for span in crossings.chunks_exact(2) {
            let first = span[0].ceil().max(0.0);
            let past = span[1].ceil().min(width as f64);
            if past <= first {
                continue;
            }
            for x in first as usize..past as usize {
                grid[(x, y)] = true;
            }
        }
    }

    grid
}

/// Marks every cell a polyline passes through.
///
/// Vertices are rounded to the nearest lattice point and consecutive vertices
/// are joined with Bresenham lines. Segments are clipped to the grid first,
/// so cells outside it are skipped and far-off vertices cost nothing extra.
/// Non-finite vertices break the polyline.
pub fn stamp_polyline(polyline: &[Point2<f64>], width: usize, height: usize) -> Grid<bool> {
    let mut grid = Grid::filled(width, height, false);

    if let [single] = polyline {
        if let Some((a, _)) = clip_segment(*single, *single, width, height) {
            mark(&mut grid, a.0, a.1);
        }
    }
    for pair in polyline.windows(2) {
        if let Some((a, b)) = clip_segment(pair[0], pair[1], width, height) {
            stamp_line(&mut grid, a, b);
        }
    }

    grid
}

/// Clips a segment to the grid rectangle grown by one cell and rounds the
/// clipped ends to lattice points.
///
/// Returns `None` when the segment misses the rectangle.
fn clip_segment(
    a: Point2<f64>,
    b: Point2<f64>,
    width: usize,
    height: usize,
) -> Option<((i64, i64), (i64, i64))> {
    if !(a.is_finite() && b.is_finite()) {
        return None;
    }

    // Liang-Barsky against [-1, width] x [-1, height]. The boundary that
    // limits each end is kept so that coordinate is exact after clipping.
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let (max_x, max_y) = (width as f64, height as f64);
    let mut enter = (0.0_f64, None);
    let mut leave = (1.0_f64, None);
    for (p, q, boundary) in [
        (-dx, a.x + 1.0, (0_u8, -1.0)),
        (dx, max_x - a.x, (0, max_x)),
        (-dy, a.y + 1.0, (1, -1.0)),
        (dy, max_y - a.y, (1, max_y)),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 && r > enter.0 {
            enter = (r, Some(boundary));
        } else if p > 0.0 && r < leave.0 {
            leave = (r, Some(boundary));
        }
    }
    if enter.0 > leave.0 {
        return None;
    }

    let cell = |(t, boundary): (f64, Option<(u8, f64)>), end: Point2<f64>| {
        let (x, y) = match boundary {
            None => (end.x, end.y),
            Some((0, x)) => (x, a.y + t * dy),
            Some((_, y)) => (a.x + t * dx, y),
        };
        (
            x.clamp(-1.0, max_x).round() as i64,
            y.clamp(-1.0, max_y).round() as i64,
        )
    };
    Some((cell(enter, a), cell(leave, b)))
}

fn stamp_line(grid: &mut Grid<bool>, (x0, y0): (i64, i64), (x1, y1): (i64, i64)) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let (mut x, mut y) = (x0, y0);
    loop {
        mark(grid, x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

#[inline]
fn mark(grid: &mut Grid<bool>, x: i64, y: i64) {
    if x >= 0 && y >= 0 && (x as usize) < grid.width() && (y as usize) < grid.height() {
        grid[(x as usize, y as usize)] = true;
    }
}

/// Computes the signed area of a polygon using the shoelace formula.
///
/// Positive for CCW winding, negative for CW winding.
pub fn polygon_signed_area(vertices: &[Point2<f64>]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }

    let n = vertices.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y
        })
        .sum();

    twice / 2.0
}

/// Tests if a point is inside a polygon using the ray casting algorithm.
///
/// Points on the boundary may return either true or false.
pub fn polygon_contains(vertices: &[Point2<f64>], point: Point2<f64>) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = vertices.len();

    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}
