//! Adaptive piecewise-cubic least-squares fitting.
//!
//! A path is fitted by cubic pieces over consecutive index intervals that
//! share their breakpoints. All pieces of one axis are solved together as a
//! single equality-constrained least-squares problem: the normal equations of
//! every interval plus one Lagrange multiplier per continuity condition at
//! each interior breakpoint.
//!
//! Breakpoints are placed greedily. Starting from the interval `[0, 3]`, the
//! trailing interval is extended one sample at a time while its mean squared
//! residual stays under the threshold on both axes. Once it does not, a new
//! interval of three samples is opened after it. The loop ends when the last
//! breakpoint reaches the final sample.

use super::piecewise::{CubicSegment, PiecewiseCubic};
use crate::error::{SkeletonError, SkeletonResult};
use crate::params::{Continuity, FitParams, DEFAULT_THRESHOLD_DIVISOR};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

/// Samples spanned by the first interval and by every newly opened one.
const INTERVAL_STEP: usize = 3;

/// Coefficients per cubic piece.
const CUBIC_TERMS: usize = 4;

/// How the breakpoint list changes after a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Move the last breakpoint one sample further.
    Extend,
    /// Append a breakpoint three samples past the last one.
    Open,
}

/// Strictly increasing interval end indices.
///
/// Interval `k` spans `[ends[k - 1], ends[k]]` (with `ends[-1] = 0`), so
/// neighboring intervals share their breakpoint sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoints {
    ends: Vec<usize>,
}

impl Breakpoints {
    /// The starting state for `n` samples: one interval `[0, min(3, n - 1)]`.
    pub fn initial(n: usize) -> Self {
        Self {
            ends: vec![INTERVAL_STEP.min(n.saturating_sub(1))],
        }
    }

    /// Creates a state from explicit end indices.
    ///
    /// Returns `None` unless the ends are non-empty, positive and strictly
    /// increasing.
    pub fn from_ends(ends: Vec<usize>) -> Option<Self> {
        let increasing = ends.windows(2).all(|w| w[0] < w[1]);
        match ends.first() {
            Some(&first) if first > 0 && increasing => Some(Self { ends }),
            _ => None,
        }
    }

    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    /// Index of the last breakpoint.
    pub fn last(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    pub fn interval_count(&self) -> usize {
        self.ends.len()
    }

    /// `(start, end)` of every interval.
    pub fn intervals(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.ends
            .iter()
            .scan(0, |start, &end| Some((std::mem::replace(start, end), end)))
    }

    /// Returns true once the last breakpoint sits on the final sample.
    pub fn is_complete(&self, n: usize) -> bool {
        self.last() + 1 >= n
    }

    /// Applies a transition for a path of `n` samples.
    ///
    /// Opening an interval that would run past the data extends the current
    /// one instead. Returns the transition actually taken.
    pub fn advance(&mut self, growth: Growth, n: usize) -> Growth {
        let last = self.last();
        match growth {
            Growth::Open if last + INTERVAL_STEP < n => {
                self.ends.push(last + INTERVAL_STEP);
                Growth::Open
            }
            _ => {
                if let Some(end) = self.ends.last_mut() {
                    *end += 1;
                }
                Growth::Extend
            }
        }
    }
}

/// Fitted x and y pieces of a path sharing one set of breakpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFit {
    pub x: PiecewiseCubic,
    pub y: PiecewiseCubic,
    /// Mean squared residual bound the trailing intervals were held to.
    pub threshold: f64,
    /// Number of samples the fit covers.
    pub samples: usize,
}

impl PathFit {
    /// End index of every interval.
    pub fn breakpoints(&self) -> Vec<usize> {
        self.x.breakpoints()
    }

    pub fn interval_count(&self) -> usize {
        self.x.len()
    }
}

/// Fits one coordinate sequence over fixed breakpoints.
///
/// Returns [`SkeletonError::SingularSystem`] when the constrained system has
/// no unique finite solution.
pub fn fit_intervals(
    values: &[f64],
    breakpoints: &Breakpoints,
    continuity: Continuity,
) -> SkeletonResult<PiecewiseCubic> {
    let system = IntervalSystem::new(breakpoints, continuity, CUBIC_TERMS);
    system.solve(&[values]).map(|mut fits| fits.remove(0))
}

/// Fits a path given as separate x and y sequences.
///
/// Uses `params.threshold` when set, otherwise [`default_threshold`]. Paths
/// with fewer than four samples get a single interpolating polynomial.
pub fn fit_path(xs: &[f64], ys: &[f64], params: &FitParams) -> SkeletonResult<PathFit> {
    if xs.len() != ys.len() {
        return Err(SkeletonError::invalid_params(format!(
            "coordinate sequences differ in length ({} vs {})",
            xs.len(),
            ys.len()
        )));
    }
    let n = xs.len();
    if n == 0 {
        return Err(SkeletonError::DegenerateInput);
    }

    let threshold = params.threshold.unwrap_or_else(|| default_threshold(xs, ys));

    if n <= INTERVAL_STEP {
        let breakpoints = Breakpoints::initial(n);
        let system = IntervalSystem::new(&breakpoints, params.continuity, n);
        let mut fits = system.solve(&[xs, ys])?;
        let y = fits.pop().unwrap_or_default();
        let x = fits.pop().unwrap_or_default();
        debug!(samples = n, "fitted short path with a single polynomial");
        return Ok(PathFit {
            x,
            y,
            threshold,
            samples: n,
        });
    }

    let mut breakpoints = Breakpoints::initial(n);
    let mut iterations = 0usize;
    loop {
        iterations += 1;
        let system = IntervalSystem::new(&breakpoints, params.continuity, CUBIC_TERMS);
        let mut fits = system.solve(&[xs, ys])?;
        let y = fits.pop().unwrap_or_default();
        let x = fits.pop().unwrap_or_default();

        if breakpoints.is_complete(n) {
            debug!(
                samples = n,
                intervals = breakpoints.interval_count(),
                iterations,
                threshold,
                "fitted path"
            );
            return Ok(PathFit {
                x,
                y,
                threshold,
                samples: n,
            });
        }

        let within = |fit: &PiecewiseCubic, values: &[f64]| {
            fit.segments()
                .last()
                .is_some_and(|s| s.mean_squared_error(values) < threshold)
        };
        let growth = if within(&x, xs) && within(&y, ys) {
            Growth::Extend
        } else {
            Growth::Open
        };
        breakpoints.advance(growth, n);
    }
}

/// Residual threshold derived from the spread of the data.
///
/// The larger population standard deviation of the two sequences divided by
/// [`DEFAULT_THRESHOLD_DIVISOR`]. Data with no spread at all gets
/// `f64::EPSILON` so that only exact fits pass.
pub fn default_threshold(xs: &[f64], ys: &[f64]) -> f64 {
    let spread = std_dev(xs).max(std_dev(ys));
    let threshold = spread / DEFAULT_THRESHOLD_DIVISOR;
    if threshold > 0.0 && threshold.is_finite() {
        threshold
    } else {
        warn!(spread, "path has no spread, using machine epsilon as fit threshold");
        f64::EPSILON
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    variance.sqrt()
}

/// The constrained normal-equation system for a fixed set of intervals.
///
/// Each interval uses the scaled local basis `((t - start) / h)^j` with
/// `h = max(end - start, 1)`, which keeps the matrix well conditioned for
/// long paths. Unknowns are laid out per interval as `terms` coefficients
/// followed by one multiplier per continuity order; the last interval has no
/// multipliers.
struct IntervalSystem {
    intervals: Vec<(usize, usize)>,
    terms: usize,
    orders: &'static [usize],
    matrix: DMatrix<f64>,
}

impl IntervalSystem {
    fn new(breakpoints: &Breakpoints, continuity: Continuity, terms: usize) -> Self {
        let intervals: Vec<(usize, usize)> = breakpoints.intervals().collect();
        let orders = if intervals.len() > 1 {
            continuity.orders()
        } else {
            &[]
        };
        let block = terms + orders.len();
        let size = intervals.len() * block - orders.len();
        let mut matrix = DMatrix::<f64>::zeros(size, size);

        for (k, &(start, end)) in intervals.iter().enumerate() {
            let base = k * block;
            let h = scale(start, end);

            // Power sums of the local parameter, up to twice the degree
            let mut power_sums = vec![0.0; 2 * terms - 1];
            for t in start..=end {
                let u = (t - start) as f64 / h;
                let mut p = 1.0;
                for sum in power_sums.iter_mut() {
                    *sum += p;
                    p *= u;
                }
            }
            for row in 0..terms {
                for col in 0..terms {
                    matrix[(base + row, base + col)] = power_sums[row + col];
                }
            }

            if k + 1 == intervals.len() {
                continue;
            }

            let (next_start, next_end) = intervals[k + 1];
            let next_base = base + block;
            let next_h = scale(next_start, next_end);
            for (m, &order) in orders.iter().enumerate() {
                let multiplier = base + terms + m;
                for j in order..terms {
                    // d^order/dt^order of u^j at u = 1 on this interval
                    let here = falling_factorial(j, order) / h.powi(order as i32);
                    matrix[(base + j, multiplier)] = here;
                    matrix[(multiplier, base + j)] = here;
                }
                // Only u^order survives at u = 0 on the next interval
                let there = falling_factorial(order, order) / next_h.powi(order as i32);
                matrix[(next_base + order, multiplier)] = -there;
                matrix[(multiplier, next_base + order)] = -there;
            }
        }

        Self {
            intervals,
            terms,
            orders,
            matrix,
        }
    }

    /// Solves the system for each value sequence with one factorization.
    fn solve(&self, axes: &[&[f64]]) -> SkeletonResult<Vec<PiecewiseCubic>> {
        let singular = SkeletonError::SingularSystem {
            intervals: self.intervals.len(),
        };
        let block = self.terms + self.orders.len();
        let lu = self.matrix.clone().lu();

        let mut fits = Vec::with_capacity(axes.len());
        for values in axes {
            let rhs = self.right_hand_side(values, block);
            let solution = lu.solve(&rhs).ok_or_else(|| singular.clone())?;
            if solution.iter().any(|v| !v.is_finite()) {
                return Err(singular);
            }

            let segments = self
                .intervals
                .iter()
                .enumerate()
                .map(|(k, &(start, end))| {
                    let h = scale(start, end);
                    let mut coefficients = [0.0; CUBIC_TERMS];
                    let mut h_pow = 1.0;
                    for (j, c) in coefficients.iter_mut().enumerate().take(self.terms) {
                        *c = solution[k * block + j] / h_pow;
                        h_pow *= h;
                    }
                    CubicSegment::new(start, end, coefficients)
                })
                .collect();
            fits.push(PiecewiseCubic::new(segments));
        }
        Ok(fits)
    }

    fn right_hand_side(&self, values: &[f64], block: usize) -> DVector<f64> {
        let mut rhs = DVector::<f64>::zeros(self.matrix.nrows());
        for (k, &(start, end)) in self.intervals.iter().enumerate() {
            let h = scale(start, end);
            for t in start..=end.min(values.len().saturating_sub(1)) {
                let u = (t - start) as f64 / h;
                let mut p = 1.0;
                for row in 0..self.terms {
                    rhs[k * block + row] += values[t] * p;
                    p *= u;
                }
            }
        }
        rhs
    }
}

#[inline]
fn scale(start: usize, end: usize) -> f64 {
    end.saturating_sub(start).max(1) as f64
}

/// `j! / (j - d)!`
#[inline]
fn falling_factorial(j: usize, d: usize) -> f64 {
    ((j - d + 1)..=j).map(|v| v as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cubic(c: [f64; 4], n: usize) -> Vec<f64> {
        (0..n)
            .map(|t| {
                let t = t as f64;
                c[0] + c[1] * t + c[2] * t * t + c[3] * t * t * t
            })
            .collect()
    }

    #[test]
    fn test_breakpoint_transitions() {
        let mut bp = Breakpoints::initial(10);
        assert_eq!(bp.ends(), &[3]);

        assert_eq!(bp.advance(Growth::Extend, 10), Growth::Extend);
        assert_eq!(bp.ends(), &[4]);
        assert_eq!(bp.advance(Growth::Open, 10), Growth::Open);
        assert_eq!(bp.ends(), &[4, 7]);
        // 7 + 3 runs past index 9, so this extends instead.
        assert_eq!(bp.advance(Growth::Open, 10), Growth::Extend);
        assert_eq!(bp.ends(), &[4, 8]);
        bp.advance(Growth::Extend, 10);
        assert!(bp.is_complete(10));

        let intervals: Vec<_> = bp.intervals().collect();
        assert_eq!(intervals, vec![(0, 4), (4, 9)]);
    }

    #[test]
    fn test_open_exactly_at_end() {
        let mut bp = Breakpoints::initial(7);
        assert_eq!(bp.advance(Growth::Open, 7), Growth::Open);
        assert_eq!(bp.ends(), &[3, 6]);
        assert!(bp.is_complete(7));
    }

    #[test]
    fn test_from_ends_validates() {
        assert!(Breakpoints::from_ends(vec![3, 6, 9]).is_some());
        assert!(Breakpoints::from_ends(vec![3, 3]).is_none());
        assert!(Breakpoints::from_ends(vec![0, 4]).is_none());
        assert!(Breakpoints::from_ends(Vec::new()).is_none());
    }

    #[test]
    fn test_pure_cubic_single_interval() {
        let c = [2.0, -1.5, 0.25, 0.01];
        let xs = cubic(c, 40);
        let ys = cubic([-3.0, 0.5, -0.02, 0.003], 40);

        let fit = fit_path(&xs, &ys, &FitParams::default().threshold(0.01)).unwrap();

        assert_eq!(fit.interval_count(), 1);
        assert_eq!(fit.breakpoints(), vec![39]);
        let seg = fit.x.segments()[0];
        assert_eq!((seg.start, seg.end), (0, 39));
        for (fitted, expected) in seg.coefficients.iter().zip(c) {
            assert_relative_eq!(*fitted, expected, epsilon = 1e-6, max_relative = 1e-6);
        }
        assert_relative_eq!(fit.y.segments()[0].coefficients[3], 0.003, epsilon = 1e-8);
    }

    #[test]
    fn test_pure_cubic_default_threshold() {
        let xs: Vec<f64> = (0..25).map(|t| t as f64).collect();
        let ys = cubic([1.0, 0.0, -0.1, 0.02], 25);

        let fit = fit_path(&xs, &ys, &FitParams::default()).unwrap();
        assert_eq!(fit.interval_count(), 1);
        for t in 0..25 {
            assert_relative_eq!(fit.y.value(t as f64).unwrap(), ys[t], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_kinked_path_gets_breakpoints() {
        // |t - 30| has a corner no single cubic can follow.
        let xs: Vec<f64> = (0..60).map(|t| t as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&t| 3.0 * (t - 30.0).abs()).collect();

        for continuity in [Continuity::Tangent, Continuity::Smooth, Continuity::Curvature] {
            let params = FitParams::default().threshold(0.5).continuity(continuity);
            let fit = fit_path(&xs, &ys, &params).unwrap();

            assert!(fit.interval_count() > 1, "{continuity:?}");
            let ends = fit.breakpoints();
            assert!(ends.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(ends.last(), Some(&59));
            assert_eq!(fit.x.segments()[0].start, 0);
        }
    }

    #[test]
    fn test_continuity_at_breakpoints() {
        let values: Vec<f64> = (0..30).map(|t| ((t as f64) * 0.4).sin() * 10.0).collect();
        let bp = Breakpoints::from_ends(vec![9, 19, 29]).unwrap();

        let smooth = fit_intervals(&values, &bp, Continuity::Smooth).unwrap();
        let curvature = fit_intervals(&values, &bp, Continuity::Curvature).unwrap();
        let tangent = fit_intervals(&values, &bp, Continuity::Tangent).unwrap();

        for pair in smooth.segments().windows(2) {
            let t = pair[0].end as f64;
            assert_relative_eq!(pair[0].value(t), pair[1].value(t), epsilon = 1e-8);
            assert_relative_eq!(pair[0].derivative(t), pair[1].derivative(t), epsilon = 1e-8);
        }
        for pair in curvature.segments().windows(2) {
            let t = pair[0].end as f64;
            assert_relative_eq!(pair[0].value(t), pair[1].value(t), epsilon = 1e-8);
            assert_relative_eq!(pair[0].derivative(t), pair[1].derivative(t), epsilon = 1e-8);
            assert_relative_eq!(
                pair[0].second_derivative(t),
                pair[1].second_derivative(t),
                epsilon = 1e-8
            );
        }
        for pair in tangent.segments().windows(2) {
            let t = pair[0].end as f64;
            assert_relative_eq!(pair[0].derivative(t), pair[1].derivative(t), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_short_paths() {
        let fit = fit_path(&[1.0, 3.0], &[2.0, 2.0], &FitParams::default()).unwrap();
        assert_eq!(fit.interval_count(), 1);
        assert_relative_eq!(fit.x.value(0.0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(fit.x.value(1.0).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(fit.x.derivative(0.5).unwrap(), 2.0, epsilon = 1e-12);

        let fit = fit_path(&[5.0], &[7.0], &FitParams::default()).unwrap();
        assert_relative_eq!(fit.y.value(0.0).unwrap(), 7.0);
        assert_eq!(fit.x.derivative(0.0), Some(0.0));

        let fit = fit_path(&[0.0, 1.0, 4.0], &[0.0, 0.0, 0.0], &FitParams::default()).unwrap();
        assert_relative_eq!(fit.x.value(2.0).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            fit_path(&[], &[], &FitParams::default()),
            Err(SkeletonError::DegenerateInput)
        );
        assert!(matches!(
            fit_path(&[1.0, 2.0], &[1.0], &FitParams::default()),
            Err(SkeletonError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_non_finite_samples_are_singular() {
        let mut xs: Vec<f64> = (0..10).map(|t| t as f64).collect();
        xs[2] = f64::NAN;
        let ys = vec![0.0; 10];

        assert_eq!(
            fit_path(&xs, &ys, &FitParams::default().threshold(1.0)),
            Err(SkeletonError::SingularSystem { intervals: 1 })
        );

        let bp = Breakpoints::from_ends(vec![4, 9]).unwrap();
        assert_eq!(
            fit_intervals(&xs, &bp, Continuity::Smooth),
            Err(SkeletonError::SingularSystem { intervals: 2 })
        );
    }

    #[test]
    fn test_default_threshold() {
        let xs = [0.0, 2.0, 4.0, 6.0];
        let ys = [1.0, 1.0, 1.0, 1.0];
        // Population std of xs is sqrt(5).
        assert_relative_eq!(default_threshold(&xs, &ys), 5.0_f64.sqrt() / 20.0, epsilon = 1e-12);
        assert_eq!(default_threshold(&ys, &ys), f64::EPSILON);
    }

    #[test]
    fn test_system_size_per_continuity() {
        let bp = Breakpoints::from_ends(vec![3, 6, 9]).unwrap();
        let size = |c| IntervalSystem::new(&bp, c, CUBIC_TERMS).matrix.nrows();
        assert_eq!(size(Continuity::Tangent), 3 * 5 - 1);
        assert_eq!(size(Continuity::Smooth), 3 * 6 - 2);
        assert_eq!(size(Continuity::Curvature), 3 * 7 - 3);
    }
}
