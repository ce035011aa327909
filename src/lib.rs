//! gencyl - Skeletons of sketched generalized cylinders
//!
//! Given the two silhouette curves of a hand-drawn tube-like shape, this
//! library recovers the medial curve running between them and fits it with a
//! smooth piecewise-cubic curve carrying unit normals.
//!
//! The work happens on a raster: the region between the curves is filled,
//! its distance field is scanned for ridge points, the ridge is cleaned up
//! and connected by a shortest path, and that path is fitted adaptively.
//! See [`pipeline`] for the stage-by-stage description and [`straight`] for
//! the closed-form variant used on nearly straight shapes.

pub mod bounds;
pub mod curves;
pub mod distance;
pub mod error;
pub mod graph;
pub mod medial;
pub mod params;
pub mod pipeline;
pub mod primitives;
pub mod raster;
pub mod spatial;
pub mod straight;

pub use bounds::Aabb2;
pub use error::{SkeletonError, SkeletonResult};
pub use params::{
    Continuity, FitParams, GridMapping, IndexKind, SkeletonParams, SmoothParams, StraightParams,
};
pub use pipeline::{
    compute_medial_axis, subdivide, subdivide_with, trace_medial_path, MedialAxis, Subdivision,
};
pub use primitives::{Point2, Segment2, Vec2};
pub use straight::{subdivide_straight, PrincipalAxis, StraightSubdivision};
