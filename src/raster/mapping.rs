//! Uniform mapping between curve coordinates and grid coordinates.

use crate::bounds::Aabb2;
use crate::primitives::{Point2, Vec2};

/// A uniform scale followed by a translation.
///
/// `grid = curve * scale + offset`. Normals and other directions are
/// unaffected because the scale is the same on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    /// Grid cells per curve unit.
    pub scale: f64,
    /// Grid position of the curve-space origin.
    pub offset: Vec2<f64>,
}

impl Default for GridTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl GridTransform {
    /// Curve coordinates are used as grid coordinates unchanged.
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::zero(),
        }
    }

    /// Fits `points` into a `width x height` grid with `margin` free cells on
    /// every side, keeping the aspect ratio.
    ///
    /// The bounding box's minimum corner lands on `(margin, margin)`. An empty
    /// point set yields the identity. A set with zero extent along both axes
    /// is only translated.
    pub fn fit<I>(points: I, width: usize, height: usize, margin: f64) -> Self
    where
        I: IntoIterator<Item = Point2<f64>>,
    {
        let Some(bounds) = Aabb2::from_points(points) else {
            return Self::identity();
        };

        let span_x = width as f64 - 1.0 - 2.0 * margin;
        let span_y = height as f64 - 1.0 - 2.0 * margin;

        let scale = [(bounds.width(), span_x), (bounds.height(), span_y)]
            .into_iter()
            .filter(|&(extent, _)| extent > f64::EPSILON)
            .map(|(extent, span)| span / extent)
            .fold(f64::INFINITY, f64::min);
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };

        let offset = Vec2::new(margin - bounds.min.x * scale, margin - bounds.min.y * scale);
        Self { scale, offset }
    }

    /// Maps a curve-space point into grid space.
    #[inline]
    pub fn to_grid(&self, p: Point2<f64>) -> Point2<f64> {
        Point2::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    /// Maps a grid-space point back into curve space.
    #[inline]
    pub fn to_curve(&self, p: Point2<f64>) -> Point2<f64> {
        Point2::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    /// Maps a whole polyline into grid space.
    pub fn polyline_to_grid(&self, polyline: &[Point2<f64>]) -> Vec<Point2<f64>> {
        polyline.iter().map(|&p| self.to_grid(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let t = GridTransform::identity();
        let p = Point2::new(3.5, -2.0);
        assert_eq!(t.to_grid(p), p);
        assert_eq!(t.to_curve(p), p);
    }

    #[test]
    fn test_fit_uses_limiting_axis() {
        let points = [Point2::new(-1.0, 0.0), Point2::new(1.0, 0.5)];
        let t = GridTransform::fit(points, 101, 101, 10.0);

        // Width 2 maps onto 80 cells, height 0.5 would allow 160.
        assert_relative_eq!(t.scale, 40.0, epsilon = 1e-12);
        let min = t.to_grid(Point2::new(-1.0, 0.0));
        let max = t.to_grid(Point2::new(1.0, 0.5));
        assert_relative_eq!(min.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(min.y, 10.0, epsilon = 1e-12);
        assert_relative_eq!(max.x, 90.0, epsilon = 1e-12);
        assert_relative_eq!(max.y, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let points = [Point2::new(0.2, 0.1), Point2::new(0.9, 0.7)];
        let t = GridTransform::fit(points, 64, 48, 2.0);
        let p = Point2::new(0.5, 0.3);
        let back = t.to_curve(t.to_grid(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_degenerate() {
        let t = GridTransform::fit(std::iter::empty(), 32, 32, 1.0);
        assert_eq!(t, GridTransform::identity());

        let t = GridTransform::fit([Point2::new(5.0, 5.0)], 32, 32, 1.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.to_grid(Point2::new(5.0, 5.0)), Point2::new(1.0, 1.0));
    }
}
