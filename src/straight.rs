//! Closed-form subdivision for nearly straight, parallel boundaries.
//!
//! The principal axis of all boundary points is sampled evenly between the
//! extreme projections. A line perpendicular to the axis is cast from each
//! sample and intersected with both boundaries; samples that hit both yield
//! one matching point pair.

use crate::error::{SkeletonError, SkeletonResult};
use crate::params::StraightParams;
use crate::primitives::{polyline_segments, Point2, Vec2};
use nalgebra::Matrix2;
use tracing::debug;

/// A line through the centroid of a point set along its direction of
/// largest variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrincipalAxis {
    pub centroid: Point2<f64>,
    /// Unit direction of the first principal component.
    pub direction: Vec2<f64>,
}

impl PrincipalAxis {
    /// Computes the principal axis of `points`.
    ///
    /// Returns `None` for an empty set or non-finite coordinates. When every
    /// point coincides there is no preferred direction and the x-axis is used.
    pub fn from_points(points: &[Point2<f64>]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let n = points.len() as f64;
        let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        let centroid = Point2::new(sx / n, sy / n);
        if !centroid.is_finite() {
            return None;
        }

        let mut cov = Matrix2::<f64>::zeros();
        for p in points {
            let d = *p - centroid;
            cov[(0, 0)] += d.x * d.x;
            cov[(0, 1)] += d.x * d.y;
            cov[(1, 0)] += d.y * d.x;
            cov[(1, 1)] += d.y * d.y;
        }
        let cov = cov / n;

        let eigen = cov.symmetric_eigen();
        let largest = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
            0
        } else {
            1
        };
        let column = eigen.eigenvectors.column(largest);
        let direction = Vec2::new(column[0], column[1])
            .normalize()
            .filter(|_| eigen.eigenvalues[largest] > f64::EPSILON)
            .unwrap_or_else(|| Vec2::new(1.0, 0.0));

        Some(Self {
            centroid,
            direction,
        })
    }

    /// Signed position of the projection of `p` along the axis.
    #[inline]
    pub fn parameter(&self, p: Point2<f64>) -> f64 {
        (p - self.centroid).dot(self.direction)
    }

    /// The axis point at signed position `s`.
    #[inline]
    pub fn point_at(&self, s: f64) -> Point2<f64> {
        self.centroid + self.direction * s
    }

    /// Unit vector perpendicular to the axis.
    #[inline]
    pub fn normal(&self) -> Vec2<f64> {
        self.direction.perpendicular()
    }
}

/// Matching boundary points produced by [`subdivide_straight`].
///
/// All three vectors have the same length; entry `i` of each belongs to the
/// same axis sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StraightSubdivision {
    /// Hits on the first boundary.
    pub side1: Vec<Point2<f64>>,
    /// Hits on the second boundary.
    pub side2: Vec<Point2<f64>>,
    /// The axis samples the hits were cast from.
    pub centers: Vec<Point2<f64>>,
}

impl StraightSubdivision {
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// Subdivides two boundaries along their common principal axis.
///
/// Returns [`SkeletonError::DegenerateInput`] when the curves hold no points
/// at all. Samples whose perpendicular misses either curve are skipped, so
/// the result may be shorter than `params.samples`.
pub fn subdivide_straight(
    curve1: &[Point2<f64>],
    curve2: &[Point2<f64>],
    params: &StraightParams,
) -> SkeletonResult<StraightSubdivision> {
    params.validate()?;

    let all: Vec<Point2<f64>> = curve1.iter().chain(curve2).copied().collect();
    let axis = PrincipalAxis::from_points(&all).ok_or(SkeletonError::DegenerateInput)?;

    let (lo, hi) = all
        .iter()
        .map(|&p| axis.parameter(p))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
    let from = axis.point_at(lo);
    let to = axis.point_at(hi);
    let normal = axis.normal();

    let mut result = StraightSubdivision::default();
    let last = (params.samples - 1) as f64;
    for i in 0..params.samples {
        let center = from.lerp(to, i as f64 / last);
        let hit1 = first_crossing(curve1, center, normal);
        let hit2 = first_crossing(curve2, center, normal);
        if let (Some(p1), Some(p2)) = (hit1, hit2) {
            result.side1.push(p1);
            result.side2.push(p2);
            result.centers.push(center);
        }
    }

    debug!(
        samples = params.samples,
        pairs = result.len(),
        "subdivided along principal axis"
    );
    Ok(result)
}

/// First segment of `polyline`, in order, crossed by the line through
/// `origin` along `direction`.
fn first_crossing(
    polyline: &[Point2<f64>],
    origin: Point2<f64>,
    direction: Vec2<f64>,
) -> Option<Point2<f64>> {
    polyline_segments(polyline).find_map(|seg| seg.intersect_line(origin, direction).map(|(p, _)| p))
}
