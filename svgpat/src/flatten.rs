//! Adaptive cubic Bézier flattening.
//!
//! Curves are bisected until the control polygon, measured *after* the
//! active transform, is no longer than the flatness threshold. Measuring
//! in output space means a magnified curve is subdivided more finely than
//! the same curve drawn small.

use lyon_geom::{CubicBezierSegment, point};
use tracing::trace;

use crate::geometry::Point;
use crate::transform::Transform;

/// Maximum control-polygon length, in output units (inches).
pub const DEFAULT_FLATNESS: f64 = 0.125;

/// Bisection depth cap: at most 2^16 segments per source curve.
pub const DEFAULT_MAX_DEPTH: u32 = 16;

/// Flattening parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flattening {
    /// Control polygons longer than this are subdivided.
    pub flatness: f64,
    /// Sub-curves at this depth are treated as flat regardless of length.
    pub max_depth: u32,
}

impl Default for Flattening {
    fn default() -> Self {
        Self {
            flatness: DEFAULT_FLATNESS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Build a local-space cubic segment from four control points.
pub fn cubic(from: Point, ctrl1: Point, ctrl2: Point, to: Point) -> CubicBezierSegment<f64> {
    CubicBezierSegment {
        from: point(from.x, from.y),
        ctrl1: point(ctrl1.x, ctrl1.y),
        ctrl2: point(ctrl2.x, ctrl2.y),
        to: point(to.x, to.y),
    }
}

/// Length of the control polygon after mapping through `transform`.
pub fn control_polygon_length(curve: &CubicBezierSegment<f64>, transform: &Transform) -> f64 {
    let p0 = transform.apply(Point::new(curve.from.x, curve.from.y));
    let p1 = transform.apply(Point::new(curve.ctrl1.x, curve.ctrl1.y));
    let p2 = transform.apply(Point::new(curve.ctrl2.x, curve.ctrl2.y));
    let p3 = transform.apply(Point::new(curve.to.x, curve.to.y));
    p0.distance(p1) + p1.distance(p2) + p2.distance(p3)
}

/// Flatten `curve` (local coordinates) into line segments.
///
/// `line_to` receives each segment's *transformed* endpoint in order; the
/// start point is the caller's current point and is not repeated.
pub fn flatten_cubic<F>(
    curve: &CubicBezierSegment<f64>,
    transform: &Transform,
    params: &Flattening,
    line_to: &mut F,
) where
    F: FnMut(Point),
{
    subdivide(curve, transform, params, 0, line_to);
}

fn subdivide<F>(
    curve: &CubicBezierSegment<f64>,
    transform: &Transform,
    params: &Flattening,
    depth: u32,
    line_to: &mut F,
) where
    F: FnMut(Point),
{
    let length = control_polygon_length(curve, transform);

    if length > params.flatness {
        if depth < params.max_depth {
            let (first, second) = curve.split(0.5);
            subdivide(&first, transform, params, depth + 1, line_to);
            subdivide(&second, transform, params, depth + 1, line_to);
            return;
        }
        trace!(depth, length, "curve subdivision depth cap reached, treating as flat");
    }

    line_to(transform.apply(Point::new(curve.to.x, curve.to.y)));
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(curve: &CubicBezierSegment<f64>, transform: &Transform, params: &Flattening) -> Vec<Point> {
        let mut out = Vec::new();
        flatten_cubic(curve, transform, params, &mut |p| out.push(p));
        out
    }

    #[test]
    fn short_colinear_curve_is_one_segment_at_any_depth() {
        let curve = cubic(
            Point::new(0.0, 0.0),
            Point::new(0.04, 0.0),
            Point::new(0.08, 0.0),
            Point::new(0.12, 0.0),
        );
        for max_depth in [0, 1, 4, DEFAULT_MAX_DEPTH, 64] {
            let params = Flattening { max_depth, ..Flattening::default() };
            let out = collect(&curve, &Transform::IDENTITY, &params);
            assert_eq!(out, vec![Point::new(0.12, 0.0)], "max_depth {max_depth}");
        }
    }

    #[test]
    fn long_curve_is_subdivided_and_ends_on_endpoint() {
        let curve = cubic(
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        );
        let out = collect(&curve, &Transform::IDENTITY, &Flattening::default());
        assert!(out.len() > 4, "expected several segments, got {}", out.len());
        assert_eq!(*out.last().unwrap(), Point::new(1.0, 0.0));

        // Every emitted point lies on the curve's hull-bounded region.
        for p in &out {
            assert!(p.x >= -1e-12 && p.x <= 1.0 + 1e-12);
            assert!(p.y >= -1e-12 && p.y <= 0.75 + 1e-12);
        }
    }

    #[test]
    fn flatness_is_measured_after_the_transform() {
        let curve = cubic(
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        );
        let params = Flattening::default();
        let small = collect(&curve, &Transform::scale(0.01, 0.01), &params);
        let unit = collect(&curve, &Transform::IDENTITY, &params);
        let large = collect(&curve, &Transform::scale(10.0, 10.0), &params);

        assert_eq!(small.len(), 1);
        assert!(unit.len() < large.len());
        // Output points are in transformed space.
        let end = *large.last().unwrap();
        assert!((end.x - 10.0).abs() < 1e-9 && end.y.abs() < 1e-9);
    }

    #[test]
    fn depth_cap_bounds_segment_count() {
        let curve = cubic(
            Point::new(0.0, 0.0),
            Point::new(0.0, 1000.0),
            Point::new(1000.0, 1000.0),
            Point::new(1000.0, 0.0),
        );
        let params = Flattening { flatness: DEFAULT_FLATNESS, max_depth: 3 };
        let out = collect(&curve, &Transform::IDENTITY, &params);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn degenerate_transform_terminates() {
        let curve = cubic(
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, -5.0),
            Point::new(15.0, 0.0),
        );
        let out = collect(&curve, &Transform::scale(0.0, 0.0), &Flattening::default());
        assert_eq!(out, vec![Point::new(0.0, 0.0)]);
    }
}
