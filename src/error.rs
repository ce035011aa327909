//! Error types for skeleton extraction and fitting.

use thiserror::Error;

/// Result type alias for skeleton operations.
pub type SkeletonResult<T> = Result<T, SkeletonError>;

/// Errors that can occur while extracting or fitting a medial skeleton.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkeletonError {
    /// One of the boundary curves has no points.
    #[error("boundary curve {curve} is empty")]
    EmptyCurve {
        /// Which curve (1 or 2) was empty.
        curve: usize,
    },

    /// No ridge points survived extraction and clustering.
    #[error("no medial axis found between the boundary curves")]
    NoMedialAxis,

    /// The proximity graph does not connect the chosen endpoints.
    #[error("no path between medial points {from} and {to}")]
    NoPath {
        /// Index of the source medial point.
        from: usize,
        /// Index of the target medial point.
        to: usize,
    },

    /// The piecewise least-squares system could not be solved.
    #[error("curve fitting system is singular ({intervals} intervals)")]
    SingularSystem {
        /// Number of intervals in the failing fit.
        intervals: usize,
    },

    /// The input has no usable principal direction or no points at all.
    #[error("degenerate input: no principal axis")]
    DegenerateInput,

    /// Configuration values were rejected.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

impl SkeletonError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }
}
