//! End-to-end medial skeleton extraction and fitting.
//!
//! The stages run in order on a fixed-resolution grid:
//!
//! 1. the region between the curves (curve 1 followed by curve 2 reversed) is
//!    scan-converted into an occupancy grid
//! 2. each curve gets a chamfer distance field and the two are combined by
//!    per-cell minimum
//! 3. ridge cells of the combined field become medial points
//! 4. only the largest proximity cluster of medial points is kept
//! 5. a proximity graph is built over the cluster and the shortest path runs
//!    between the points closest to the curves' start and end midpoints
//! 6. the path is fitted with adaptive piecewise cubics and resampled into
//!    positions and normals
//!
//! Curves are expected in the same direction. Crossing or opposed curves are
//! not detected and give meaningless output.

use crate::curves::{fit_path, sample_all, smooth_points, PathFit};
use crate::distance::combined_distance_field;
use crate::error::{SkeletonError, SkeletonResult};
use crate::graph::{build_proximity_graph, shortest_path, NeighborSearch, WeightedGraph};
use crate::medial::{extract_ridge_points, largest_cluster};
use crate::params::{GridMapping, IndexKind, SkeletonParams};
use crate::primitives::{Point2, Vec2};
use crate::raster::{rasterize_polygon, GridTransform};
use crate::spatial::{nearest_index, BruteForce, KdTree, PointsInRect};
use tracing::{debug, info};

/// The filtered medial cluster and the path endpoints chosen on it.
///
/// Points are in grid coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MedialAxis {
    /// Medial points of the largest cluster, in row-major scan order.
    pub points: Vec<Point2<f64>>,
    /// Index into `points` closest to the midpoint of the curves' first points.
    pub source: usize,
    /// Index into `points` closest to the midpoint of the curves' last points.
    pub target: usize,
}

/// Result of [`subdivide_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct Subdivision {
    /// Fitted skeleton positions, one per path sample, in curve coordinates.
    pub positions: Vec<Point2<f64>>,
    /// Unit normals matching `positions`.
    pub normals: Vec<Vec2<f64>>,
    /// The shortest path the fit was computed from, in curve coordinates.
    pub path: Vec<Point2<f64>>,
    /// The piecewise fit, in grid coordinates.
    pub fit: PathFit,
}

impl Subdivision {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Runs the full pipeline with default parameters.
///
/// # Example
///
/// ```
/// use gencyl::{subdivide, Point2};
///
/// let l1 = [Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)];
/// let l2 = [Point2::new(0.0, 20.0), Point2::new(100.0, 20.0)];
///
/// let result = subdivide(&l1, &l2).unwrap();
/// assert_eq!(result.positions.len(), result.normals.len());
/// assert!(result.positions.iter().all(|p| (p.y - 10.0).abs() < 0.5));
/// ```
pub fn subdivide(curve1: &[Point2<f64>], curve2: &[Point2<f64>]) -> SkeletonResult<Subdivision> {
    subdivide_with(curve1, curve2, &SkeletonParams::default())
}

/// Runs the full pipeline: medial axis, shortest path, fit and resampling.
pub fn subdivide_with(
    curve1: &[Point2<f64>],
    curve2: &[Point2<f64>],
    params: &SkeletonParams,
) -> SkeletonResult<Subdivision> {
    let transform = grid_transform(curve1, curve2, params)?;
    let grid1 = transform.polyline_to_grid(curve1);
    let grid2 = transform.polyline_to_grid(curve2);

    let axis = medial_axis_in_grid(&grid1, &grid2, params)?;
    let mut path = path_in_grid(&axis, params)?;

    if let Some(smoothing) = &params.path_smoothing {
        path = smooth_points(&path, smoothing);
    }

    let xs: Vec<f64> = path.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = path.iter().map(|p| p.y).collect();
    let fit = fit_path(&xs, &ys, &params.fit)?;

    let (positions, normals): (Vec<_>, Vec<_>) = sample_all(&fit)
        .into_iter()
        .map(|s| (transform.to_curve(s.position), s.normal))
        .unzip();

    info!(
        medial_points = axis.points.len(),
        path_len = path.len(),
        intervals = fit.interval_count(),
        "subdivided generalized cylinder"
    );

    Ok(Subdivision {
        positions,
        normals,
        path: path.into_iter().map(|p| transform.to_curve(p)).collect(),
        fit,
    })
}

/// Extracts the filtered medial cluster between two curves.
///
/// Points are returned in curve coordinates together with the source and
/// target indices used for path tracing.
pub fn compute_medial_axis(
    curve1: &[Point2<f64>],
    curve2: &[Point2<f64>],
    params: &SkeletonParams,
) -> SkeletonResult<MedialAxis> {
    let transform = grid_transform(curve1, curve2, params)?;
    let axis = medial_axis_in_grid(
        &transform.polyline_to_grid(curve1),
        &transform.polyline_to_grid(curve2),
        params,
    )?;
    Ok(MedialAxis {
        points: axis.points.iter().map(|&p| transform.to_curve(p)).collect(),
        ..axis
    })
}

/// Traces the ordered medial path from the start of the curves to their end.
///
/// The result is the raw shortest path in curve coordinates, before
/// smoothing or fitting.
pub fn trace_medial_path(
    curve1: &[Point2<f64>],
    curve2: &[Point2<f64>],
    params: &SkeletonParams,
) -> SkeletonResult<Vec<Point2<f64>>> {
    let transform = grid_transform(curve1, curve2, params)?;
    let axis = medial_axis_in_grid(
        &transform.polyline_to_grid(curve1),
        &transform.polyline_to_grid(curve2),
        params,
    )?;
    let path = path_in_grid(&axis, params)?;
    Ok(path.into_iter().map(|p| transform.to_curve(p)).collect())
}

/// Validates inputs and works out the curve-to-grid mapping.
fn grid_transform(
    curve1: &[Point2<f64>],
    curve2: &[Point2<f64>],
    params: &SkeletonParams,
) -> SkeletonResult<GridTransform> {
    params.validate()?;
    if curve1.is_empty() {
        return Err(SkeletonError::EmptyCurve { curve: 1 });
    }
    if curve2.is_empty() {
        return Err(SkeletonError::EmptyCurve { curve: 2 });
    }

    Ok(match params.mapping {
        GridMapping::Identity => GridTransform::identity(),
        GridMapping::FitToGrid { margin } => GridTransform::fit(
            curve1.iter().chain(curve2).copied(),
            params.grid_width,
            params.grid_height,
            margin,
        ),
    })
}

fn medial_axis_in_grid(
    curve1: &[Point2<f64>],
    curve2: &[Point2<f64>],
    params: &SkeletonParams,
) -> SkeletonResult<MedialAxis> {
    let (width, height) = (params.grid_width, params.grid_height);

    // Both curves run the same way, so the second is walked backwards to close the loop
    let polygon: Vec<Point2<f64>> = curve1.iter().chain(curve2.iter().rev()).copied().collect();
    let occupancy = rasterize_polygon(&polygon, width, height);
    let field = combined_distance_field(curve1, curve2, width, height);
    let ridge = extract_ridge_points(&occupancy, &field, params.ridge_min_count);
    debug!(
        occupied = occupancy.count_occupied(),
        ridge_points = ridge.len(),
        "extracted ridge"
    );

    let points = largest_cluster(&ridge, params.proximity_threshold);
    if points.is_empty() {
        return Err(SkeletonError::NoMedialAxis);
    }

    let start = curve1[0].midpoint(curve2[0]);
    let end = curve1[curve1.len() - 1].midpoint(curve2[curve2.len() - 1]);
    let source = nearest_index(&points, start).ok_or(SkeletonError::NoMedialAxis)?;
    let target = nearest_index(&points, end).ok_or(SkeletonError::NoMedialAxis)?;

    Ok(MedialAxis {
        points,
        source,
        target,
    })
}

fn path_in_grid(axis: &MedialAxis, params: &SkeletonParams) -> SkeletonResult<Vec<Point2<f64>>> {
    let graph = proximity_graph(&axis.points, params);
    let indices = shortest_path(&graph, axis.source, axis.target).ok_or(SkeletonError::NoPath {
        from: axis.source,
        to: axis.target,
    })?;
    debug!(
        edges = graph.edge_count(),
        path_len = indices.len(),
        "traced shortest medial path"
    );
    Ok(indices.into_iter().map(|i| axis.points[i]).collect())
}

fn proximity_graph(points: &[Point2<f64>], params: &SkeletonParams) -> WeightedGraph {
    let search = NeighborSearch {
        radius: params.proximity_threshold,
        growth: params.search_growth,
        min_neighbors: params.min_neighbors,
    };
    let index: Box<dyn PointsInRect<f64> + '_> = match params.index {
        IndexKind::BruteForce => Box::new(BruteForce::new(points)),
        IndexKind::KdTree { leaf_size, seed } => Box::new(KdTree::build(points, leaf_size, seed)),
    };
    build_proximity_graph(points, index.as_ref(), search)
}
