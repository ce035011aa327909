//! End-to-end scenarios for the skeleton pipeline.

use approx::assert_relative_eq;
use gencyl::{
    compute_medial_axis, subdivide, subdivide_with, trace_medial_path, Continuity, FitParams,
    IndexKind, Point2, SkeletonError, SkeletonParams, SmoothParams, Vec2,
};

fn parallel_lines() -> (Vec<Point2<f64>>, Vec<Point2<f64>>) {
    (
        vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)],
        vec![Point2::new(0.0, 20.0), Point2::new(100.0, 20.0)],
    )
}

const CENTER: Point2<f64> = Point2 { x: 256.0, y: 40.0 };

/// Two concentric arcs running counter-clockwise from 20 to 160 degrees.
fn arc_band(inner: f64, outer: f64) -> (Vec<Point2<f64>>, Vec<Point2<f64>>) {
    let arc = |r: f64| -> Vec<Point2<f64>> {
        (0..60)
            .map(|i| {
                let angle = (20.0 + 140.0 * i as f64 / 59.0).to_radians();
                Point2::new(CENTER.x + r * angle.cos(), CENTER.y + r * angle.sin())
            })
            .collect()
    };
    (arc(inner), arc(outer))
}

#[test]
fn parallel_lines_give_centered_skeleton() {
    let (l1, l2) = parallel_lines();
    let result = subdivide(&l1, &l2).unwrap();

    assert!(result.len() > 10);
    assert_eq!(result.positions.len(), result.normals.len());
    assert_eq!(result.positions.len(), result.path.len());

    for (p, n) in result.positions.iter().zip(&result.normals) {
        assert_relative_eq!(p.y, 10.0, epsilon = 1e-6);
        assert_relative_eq!(n.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(n.y.abs(), 1.0, epsilon = 1e-6);
    }

    let first = result.positions[0];
    let last = result.positions[result.len() - 1];
    assert!(first.x < 3.0, "first x = {}", first.x);
    assert!(last.x > 97.0, "last x = {}", last.x);
}

#[test]
fn single_point_curves_report_no_medial_axis() {
    let l1 = vec![Point2::new(0.0, 0.0)];
    let l2 = vec![Point2::new(0.0, 1.0)];

    assert_eq!(subdivide(&l1, &l2).unwrap_err(), SkeletonError::NoMedialAxis);
    assert_eq!(
        compute_medial_axis(&l1, &l2, &SkeletonParams::default()).unwrap_err(),
        SkeletonError::NoMedialAxis
    );
}

#[test]
fn curves_outside_grid_report_no_medial_axis() {
    let l1 = vec![Point2::new(-300.0, -300.0), Point2::new(-100.0, -300.0)];
    let l2 = vec![Point2::new(-300.0, -200.0), Point2::new(-100.0, -200.0)];
    assert_eq!(subdivide(&l1, &l2).unwrap_err(), SkeletonError::NoMedialAxis);
}

#[test]
fn curves_far_beyond_grid_are_clipped() {
    let l1 = vec![Point2::new(-1e12, 0.0), Point2::new(1e12, 0.0)];
    let l2 = vec![Point2::new(-1e12, 20.0), Point2::new(1e12, 20.0)];
    let result = subdivide(&l1, &l2).unwrap();

    for p in &result.positions {
        assert_relative_eq!(p.y, 10.0, epsilon = 1e-6);
    }
    assert!(result.path[0].x < 3.0);
    assert!(result.path[result.path.len() - 1].x > 508.0);

    let l1 = vec![Point2::new(-5e18, 0.0), Point2::new(5e18, 0.0)];
    let l2 = vec![Point2::new(-5e18, 20.0), Point2::new(5e18, 20.0)];
    let result = subdivide(&l1, &l2).unwrap();
    assert!(result.positions.iter().all(|p| (p.y - 10.0).abs() < 1e-6));
}

#[test]
fn arc_band_skeleton_follows_mid_radius() {
    let (inner, outer) = arc_band(100.0, 150.0);
    let result = subdivide(&inner, &outer).unwrap();

    assert!(result.len() > 20);
    for p in &result.positions {
        let r = p.distance(CENTER);
        assert!((r - 125.0).abs() < 6.0, "radius {r} at {p:?}");
    }

    // Normals are unit length and perpendicular to the fitted tangent.
    for (t, n) in result.normals.iter().enumerate() {
        let dx = result.fit.x.derivative(t as f64).unwrap();
        let dy = result.fit.y.derivative(t as f64).unwrap();
        let tangent = Vec2::new(dx, dy).normalize_or_zero();
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-9);
        assert!(n.dot(tangent).abs() < 1e-9, "normal {n:?} at index {t}");
    }
}

#[test]
fn arc_band_path_runs_between_curve_ends() {
    let (inner, outer) = arc_band(100.0, 150.0);
    let path = trace_medial_path(&inner, &outer, &SkeletonParams::default()).unwrap();

    let start = inner[0].midpoint(outer[0]);
    let end = inner[59].midpoint(outer[59]);
    assert!(path[0].distance(start) < 6.0);
    assert!(path[path.len() - 1].distance(end) < 6.0);
}

#[test]
fn medial_axis_endpoints_match_nearest_points() {
    let (inner, outer) = arc_band(100.0, 150.0);
    let axis = compute_medial_axis(&inner, &outer, &SkeletonParams::default()).unwrap();

    let start = inner[0].midpoint(outer[0]);
    let best = axis
        .points
        .iter()
        .map(|p| p.distance_squared(start))
        .fold(f64::INFINITY, f64::min);
    assert_eq!(axis.points[axis.source].distance_squared(start), best);
}

#[test]
fn options_do_not_break_the_band() {
    let (l1, l2) = parallel_lines();
    let variants = [
        SkeletonParams::default().index(IndexKind::BruteForce),
        SkeletonParams::default().fit(FitParams::default().continuity(Continuity::Curvature)),
        SkeletonParams::default().fit(FitParams::default().continuity(Continuity::Tangent)),
        SkeletonParams::default().path_smoothing(SmoothParams::default()),
        SkeletonParams::default().proximity_threshold(2.0).min_neighbors(3),
    ];

    for params in &variants {
        let result = subdivide_with(&l1, &l2, params).unwrap();
        assert!(!result.is_empty());
        for p in &result.positions {
            assert_relative_eq!(p.y, 10.0, epsilon = 1e-6);
        }
    }
}
