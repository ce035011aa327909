//! 2D line segment type, one edge of a boundary polyline.

use super::{Point2, Vec2};
use num_traits::Float;

/// A 2D line segment defined by two endpoints.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    /// Returns the direction vector from start to end.
    #[inline]
    pub fn direction(self) -> Vec2<F> {
        self.end - self.start
    }

    /// Returns the length of the segment.
    #[inline]
    pub fn length(self) -> F {
        self.start.distance(self.end)
    }

    /// Returns the point at parameter `t` along the segment.
    ///
    /// - `t = 0` returns `start`
    /// - `t = 1` returns `end`
    /// - Values outside [0, 1] extrapolate beyond the segment
    #[inline]
    pub fn point_at(self, t: F) -> Point2<F> {
        self.start.lerp(self.end, t)
    }

    /// Intersects the infinite line `origin + s * direction` with this segment.
    ///
    /// Returns the intersection point and its parameter along the segment, or
    /// `None` when the line is parallel to the segment, the direction is zero,
    /// or the crossing falls outside the segment's `[0, 1]` parameter range.
    pub fn intersect_line(self, origin: Point2<F>, direction: Vec2<F>) -> Option<(Point2<F>, F)> {
        let edge = self.direction();

        // origin + s * d = start + t * e  =>  s * d - t * e = start - origin
        let det = edge.cross(direction);
        if det.abs() <= F::epsilon() {
            return None;
        }

        let offset = self.start - origin;
        let t = direction.cross(offset) / det;
        if t < F::zero() || t > F::one() {
            return None;
        }

        Some((self.point_at(t), t))
    }
}

impl<F: Float> From<(Point2<F>, Point2<F>)> for Segment2<F> {
    fn from((start, end): (Point2<F>, Point2<F>)) -> Self {
        Self::new(start, end)
    }
}
