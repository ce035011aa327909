//! Floating-point geometric primitives and operations.

mod point2;
mod segment2;
mod vec2;

pub use point2::Point2;
pub use segment2::Segment2;
pub use vec2::Vec2;

use num_traits::Float;

/// Iterates over the segments of a polyline in order.
pub fn polyline_segments<F: Float>(polyline: &[Point2<F>]) -> impl Iterator<Item = Segment2<F>> + '_ {
    polyline.windows(2).map(|w| Segment2::new(w[0], w[1]))
}
