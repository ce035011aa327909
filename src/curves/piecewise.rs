//! Piecewise cubic polynomials over sample-index intervals.

/// One cubic piece valid over the closed index range `[start, end]`.
///
/// Coefficients are in the local parameter `u = t - start`, lowest power
/// first: `c0 + c1 u + c2 u² + c3 u³`. A piece starting at index 0 therefore
/// carries the coefficients of the global polynomial in `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub start: usize,
    pub end: usize,
    pub coefficients: [f64; 4],
}

impl CubicSegment {
    /// Creates a segment from its range and local coefficients.
    pub fn new(start: usize, end: usize, coefficients: [f64; 4]) -> Self {
        Self {
            start,
            end,
            coefficients,
        }
    }

    /// Value at index `t`.
    pub fn value(&self, t: f64) -> f64 {
        let u = t - self.start as f64;
        let [c0, c1, c2, c3] = self.coefficients;
        ((c3 * u + c2) * u + c1) * u + c0
    }

    /// First derivative with respect to `t`.
    pub fn derivative(&self, t: f64) -> f64 {
        let u = t - self.start as f64;
        let [_, c1, c2, c3] = self.coefficients;
        (3.0 * c3 * u + 2.0 * c2) * u + c1
    }

    /// Second derivative with respect to `t`.
    pub fn second_derivative(&self, t: f64) -> f64 {
        let u = t - self.start as f64;
        let [_, _, c2, c3] = self.coefficients;
        6.0 * c3 * u + 2.0 * c2
    }

    /// Mean squared residual against `values` over this segment's range.
    ///
    /// Indices past the end of `values` are ignored.
    pub fn mean_squared_error(&self, values: &[f64]) -> f64 {
        let end = self.end.min(values.len().saturating_sub(1));
        if values.is_empty() || end < self.start {
            return 0.0;
        }
        let sum: f64 = (self.start..=end)
            .map(|t| {
                let r = values[t] - self.value(t as f64);
                r * r
            })
            .sum();
        sum / (end - self.start + 1) as f64
    }
}

/// Consecutive cubic segments sharing their breakpoint indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PiecewiseCubic {
    segments: Vec<CubicSegment>,
}

impl PiecewiseCubic {
    /// Wraps segments ordered by start index.
    pub fn new(segments: Vec<CubicSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End index of every segment, in order.
    pub fn breakpoints(&self) -> Vec<usize> {
        self.segments.iter().map(|s| s.end).collect()
    }

    /// The segment responsible for index `t`.
    ///
    /// A breakpoint belongs to the segment it ends. Values before the first
    /// segment use the first one and values past the last use the last one.
    pub fn segment_at(&self, t: f64) -> Option<&CubicSegment> {
        let i = self.segments.partition_point(|s| (s.end as f64) < t);
        self.segments.get(i.min(self.segments.len().checked_sub(1)?))
    }

    /// Value at `t`, or `None` if there are no segments.
    pub fn value(&self, t: f64) -> Option<f64> {
        self.segment_at(t).map(|s| s.value(t))
    }

    /// First derivative at `t`, or `None` if there are no segments.
    pub fn derivative(&self, t: f64) -> Option<f64> {
        self.segment_at(t).map(|s| s.derivative(t))
    }
}
