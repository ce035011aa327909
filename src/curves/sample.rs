//! Position and normal sampling of a fitted path.

use super::fit::PathFit;
use crate::primitives::{Point2, Vec2};

/// A point on the fitted path with its unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampledPoint {
    pub position: Point2<f64>,
    /// Tangent rotated a quarter turn counter-clockwise, normalized.
    /// Zero where the tangent vanishes.
    pub normal: Vec2<f64>,
}

/// Evaluates the fit at sample index `t`.
///
/// The interval is chosen by the breakpoint range containing `t`. A fit with
/// no intervals samples as the origin with a zero normal.
pub fn sample(fit: &PathFit, t: f64) -> SampledPoint {
    let (x, dx) = fit
        .x
        .segment_at(t)
        .map_or((0.0, 0.0), |s| (s.value(t), s.derivative(t)));
    let (y, dy) = fit
        .y
        .segment_at(t)
        .map_or((0.0, 0.0), |s| (s.value(t), s.derivative(t)));

    SampledPoint {
        position: Point2::new(x, y),
        normal: Vec2::new(dx, dy).perpendicular().normalize_or_zero(),
    }
}

/// Samples every path index `0..fit.samples`.
pub fn sample_all(fit: &PathFit) -> Vec<SampledPoint> {
    (0..fit.samples).map(|t| sample(fit, t as f64)).collect()
}
