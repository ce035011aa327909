//! Parameters for skeleton extraction, path fitting and the straight variant.
//!
//! Every tuning constant of the pipeline lives here as a named default and can
//! be overridden through the builder setters.

use crate::error::{SkeletonError, SkeletonResult};

/// Default raster resolution along each axis.
pub const DEFAULT_GRID_SIZE: usize = 512;

/// Default distance under which two medial points are considered connected.
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 3.0;

/// Default factor applied to the neighbor search window on each retry.
pub const DEFAULT_SEARCH_GROWTH: f64 = 1.5;

/// Default number of distinct neighbors each medial point is linked to.
pub const DEFAULT_MIN_NEIGHBORS: usize = 2;

/// Default number of 3x3 cells (center included) that must not exceed the
/// center's distance for the center to count as a ridge point.
pub const DEFAULT_RIDGE_MIN_COUNT: usize = 7;

/// Default maximum number of points kept in a kd-tree leaf.
pub const DEFAULT_LEAF_SIZE: usize = 10;

/// Divisor applied to the larger coordinate standard deviation to derive the
/// default fitting threshold.
pub const DEFAULT_THRESHOLD_DIVISOR: f64 = 20.0;

/// Default number of axis samples for the straight variant.
pub const DEFAULT_STRAIGHT_SAMPLES: usize = 50;

/// Which range-query structure backs the proximity graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Linear scan over every point.
    BruteForce,
    /// Randomized 2D partitioning tree with a reproducible pivot sequence.
    KdTree {
        /// Nodes with fewer points than this become leaves.
        leaf_size: usize,
        /// Seed for the pivot selection.
        seed: u64,
    },
}

impl Default for IndexKind {
    fn default() -> Self {
        Self::KdTree {
            leaf_size: DEFAULT_LEAF_SIZE,
            seed: 0,
        }
    }
}

/// Continuity enforced between adjacent cubic intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuity {
    /// First derivatives match at breakpoints.
    Tangent,
    /// Values and first derivatives match at breakpoints.
    #[default]
    Smooth,
    /// Values, first and second derivatives match at breakpoints.
    Curvature,
}

impl Continuity {
    /// Derivative orders that must agree across a breakpoint.
    pub fn orders(self) -> &'static [usize] {
        match self {
            Self::Tangent => &[1],
            Self::Smooth => &[0, 1],
            Self::Curvature => &[0, 1, 2],
        }
    }
}

/// Parameters for the adaptive piecewise-cubic fit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitParams {
    /// Mean squared residual the trailing interval must stay under.
    /// `None` derives it from the data spread.
    pub threshold: Option<f64>,

    /// Continuity enforced at interior breakpoints.
    pub continuity: Continuity,
}

impl FitParams {
    /// Set an explicit residual threshold.
    #[must_use]
    pub const fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the continuity mode.
    #[must_use]
    pub const fn continuity(mut self, continuity: Continuity) -> Self {
        self.continuity = continuity;
        self
    }
}

/// Neighbor-average smoothing applied to the raw shortest path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothParams {
    /// Blend factor towards the neighbor average, in `[0, 1]`.
    pub amount: f64,
    /// Number of smoothing passes.
    pub passes: usize,
    /// Keep the first and last points fixed.
    pub keep_edges: bool,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            amount: 0.5,
            passes: 1,
            keep_edges: true,
        }
    }
}

/// How input curves are placed onto the raster grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GridMapping {
    /// Curve coordinates are grid coordinates; the caller keeps them in range.
    #[default]
    Identity,
    /// Uniformly rescale the curves to fill the grid, leaving `margin` cells
    /// free on every side. Results are mapped back to curve coordinates.
    FitToGrid {
        /// Free cells kept around the curves.
        margin: f64,
    },
}

/// Parameters for the medial skeleton pipeline.
///
/// # Example
///
/// ```
/// use gencyl::{IndexKind, SkeletonParams};
///
/// let params = SkeletonParams::default()
///     .proximity_threshold(4.0)
///     .index(IndexKind::BruteForce);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonParams {
    /// Raster width in cells.
    pub grid_width: usize,

    /// Raster height in cells.
    pub grid_height: usize,

    /// Distance under which medial points are clustered and linked.
    pub proximity_threshold: f64,

    /// Factor by which the neighbor search window grows on each retry.
    pub search_growth: f64,

    /// Number of other points each medial point must be linked to.
    pub min_neighbors: usize,

    /// Cells of the 3x3 neighborhood (of 9) that must not exceed the center.
    pub ridge_min_count: usize,

    /// Range-query structure used to build the proximity graph.
    pub index: IndexKind,

    /// Piecewise-cubic fitting parameters.
    pub fit: FitParams,

    /// Optional smoothing of the shortest path before fitting.
    pub path_smoothing: Option<SmoothParams>,

    /// Placement of the input curves onto the grid.
    pub mapping: GridMapping,
}

impl Default for SkeletonParams {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_SIZE,
            grid_height: DEFAULT_GRID_SIZE,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            search_growth: DEFAULT_SEARCH_GROWTH,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            ridge_min_count: DEFAULT_RIDGE_MIN_COUNT,
            index: IndexKind::default(),
            fit: FitParams::default(),
            path_smoothing: None,
            mapping: GridMapping::Identity,
        }
    }
}

impl SkeletonParams {
    /// Set the grid resolution.
    #[must_use]
    pub const fn grid_size(mut self, width: usize, height: usize) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    /// Set the proximity threshold.
    #[must_use]
    pub const fn proximity_threshold(mut self, threshold: f64) -> Self {
        self.proximity_threshold = threshold;
        self
    }

    /// Set the search window growth factor.
    #[must_use]
    pub const fn search_growth(mut self, growth: f64) -> Self {
        self.search_growth = growth;
        self
    }

    /// Set the number of neighbors linked per point.
    #[must_use]
    pub const fn min_neighbors(mut self, count: usize) -> Self {
        self.min_neighbors = count;
        self
    }

    /// Set the ridge detection count.
    #[must_use]
    pub const fn ridge_min_count(mut self, count: usize) -> Self {
        self.ridge_min_count = count;
        self
    }

    /// Set the spatial index.
    #[must_use]
    pub const fn index(mut self, index: IndexKind) -> Self {
        self.index = index;
        self
    }

    /// Set the fitting parameters.
    #[must_use]
    pub const fn fit(mut self, fit: FitParams) -> Self {
        self.fit = fit;
        self
    }

    /// Enable path smoothing before fitting.
    #[must_use]
    pub const fn path_smoothing(mut self, smoothing: SmoothParams) -> Self {
        self.path_smoothing = Some(smoothing);
        self
    }

    /// Set the grid mapping.
    #[must_use]
    pub const fn mapping(mut self, mapping: GridMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Checks that every value is usable by the pipeline.
    pub fn validate(&self) -> SkeletonResult<()> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(SkeletonError::invalid_params(format!(
                "grid must be at least 3x3, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if !(self.proximity_threshold.is_finite() && self.proximity_threshold > 0.0) {
            return Err(SkeletonError::invalid_params(format!(
                "proximity threshold must be positive, got {}",
                self.proximity_threshold
            )));
        }
        if !(self.search_growth.is_finite() && self.search_growth > 1.0) {
            return Err(SkeletonError::invalid_params(format!(
                "search growth must exceed 1, got {}",
                self.search_growth
            )));
        }
        if self.min_neighbors == 0 {
            return Err(SkeletonError::invalid_params("min_neighbors must be at least 1"));
        }
        if self.ridge_min_count == 0 || self.ridge_min_count > 9 {
            return Err(SkeletonError::invalid_params(format!(
                "ridge count must be within 1..=9, got {}",
                self.ridge_min_count
            )));
        }
        if let IndexKind::KdTree { leaf_size: 0, .. } = self.index {
            return Err(SkeletonError::invalid_params("kd-tree leaf size must be positive"));
        }
        if let Some(threshold) = self.fit.threshold {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(SkeletonError::invalid_params(format!(
                    "fit threshold must be positive, got {threshold}"
                )));
            }
        }
        if let Some(smoothing) = self.path_smoothing {
            if !(0.0..=1.0).contains(&smoothing.amount) {
                return Err(SkeletonError::invalid_params(format!(
                    "smoothing amount must be within [0, 1], got {}",
                    smoothing.amount
                )));
            }
        }
        if let GridMapping::FitToGrid { margin } = self.mapping {
            let span = self.grid_width.min(self.grid_height) as f64 - 1.0;
            if !(margin.is_finite() && margin >= 0.0 && 2.0 * margin < span) {
                return Err(SkeletonError::invalid_params(format!(
                    "grid margin {margin} does not fit a {}x{} grid",
                    self.grid_width, self.grid_height
                )));
            }
        }
        Ok(())
    }
}

/// Parameters for the straight-cylinder (principal axis) variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StraightParams {
    /// Number of evenly spaced samples along the axis.
    pub samples: usize,
}

impl Default for StraightParams {
    fn default() -> Self {
        Self {
            samples: DEFAULT_STRAIGHT_SAMPLES,
        }
    }
}

impl StraightParams {
    /// Set the number of axis samples.
    #[must_use]
    pub const fn samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Checks that the sample count can span a segment.
    pub fn validate(&self) -> SkeletonResult<()> {
        if self.samples < 2 {
            return Err(SkeletonError::invalid_params(format!(
                "straight variant needs at least 2 samples, got {}",
                self.samples
            )));
        }
        Ok(())
    }
}
