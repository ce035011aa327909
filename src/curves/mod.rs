//! Piecewise-cubic path fitting, sampling and smoothing.

mod fit;
mod piecewise;
mod sample;
mod smooth;

pub use fit::{default_threshold, fit_intervals, fit_path, Breakpoints, Growth, PathFit};
pub use piecewise::{CubicSegment, PiecewiseCubic};
pub use sample::{sample, sample_all, SampledPoint};
pub use smooth::{smooth, smooth_keep_edges, smooth_points};
