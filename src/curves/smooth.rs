//! Neighbor-average smoothing of sampled sequences.

use crate::params::SmoothParams;
use crate::primitives::Point2;

/// Blends every value towards the average of its two neighbors.
///
/// `amount = 0` returns the input, `amount = 1` replaces each value by the
/// neighbor average. The ends use themselves as their missing neighbor.
pub fn smooth(values: &[f64], amount: f64) -> Vec<f64> {
    let n = values.len();
    (0..n)
        .map(|i| {
            let prev = if i > 0 { values[i - 1] } else { values[i] };
            let next = if i + 1 < n { values[i + 1] } else { values[i] };
            (1.0 - amount) * values[i] + amount * (prev + next) / 2.0
        })
        .collect()
}

/// Like [`smooth`] but leaves the first and last values untouched.
pub fn smooth_keep_edges(values: &[f64], amount: f64) -> Vec<f64> {
    let n = values.len();
    if n <= 2 {
        return values.to_vec();
    }
    let mut result = smooth(values, amount);
    result[0] = values[0];
    result[n - 1] = values[n - 1];
    result
}

/// Smooths a point sequence axis by axis.
pub fn smooth_points(points: &[Point2<f64>], params: &SmoothParams) -> Vec<Point2<f64>> {
    let mut xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let mut ys: Vec<f64> = points.iter().map(|p| p.y).collect();

    let pass: fn(&[f64], f64) -> Vec<f64> = if params.keep_edges {
        smooth_keep_edges
    } else {
        smooth
    };
    for _ in 0..params.passes {
        xs = pass(&xs, params.amount);
        ys = pass(&ys, params.amount);
    }

    xs.into_iter().zip(ys).map(|(x, y)| Point2::new(x, y)).collect()
}
