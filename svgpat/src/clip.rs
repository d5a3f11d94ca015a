//! Half-plane clipping of polylines against the page.
//!
//! Every point of every polyline goes through here four times, once per
//! page edge, so the loop stays allocation-light: one output `Vec` per
//! surviving run of points and nothing else.

use tracing::info;

use crate::geometry::{Point, Polyline, point_count};
use crate::page::Page;

/// Default tolerance absorbing floating-point error at exact page edges.
pub const DEFAULT_CLIP_EPSILON: f64 = 1e-4;

// ============================================================================
// HALF-PLANES
// ============================================================================
//
// ## Rust Lesson #10: Small Copy types
//
// A `HalfPlane` is three floats. Deriving `Copy` lets us pass it by value
// everywhere without thinking about borrows.

/// The region `a·x + b·y + c ≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl HalfPlane {
    #[inline]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Signed value of the constraint; `>= 0` is inside.
    #[inline]
    pub fn eval(&self, p: Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }
}

/// The four planes bounding `[−ε, W+ε] × [−ε, H+ε]`, in clipping order.
pub fn page_half_planes(page: &Page, epsilon: f64) -> [HalfPlane; 4] {
    [
        HalfPlane::new(1.0, 0.0, epsilon),
        HalfPlane::new(0.0, 1.0, epsilon),
        HalfPlane::new(-1.0, 0.0, page.width + epsilon),
        HalfPlane::new(0.0, -1.0, page.height + epsilon),
    ]
}

// ============================================================================
// CLIPPING
// ============================================================================

/// Clip every polyline against one half-plane.
///
/// Runs of inside points are kept. Where the polyline crosses the boundary,
/// the exact crossing point is interpolated and becomes the end (leaving)
/// or the start (entering) of an output polyline. A single input polyline
/// can produce zero, one or several outputs.
pub fn clip_polylines(polylines: &[Polyline], plane: HalfPlane) -> Vec<Polyline> {
    let mut out: Vec<Polyline> = Vec::with_capacity(polylines.len());

    for polyline in polylines {
        let mut prev: Option<(Point, f64)> = None;

        for &pt in polyline {
            let val = plane.eval(pt);

            match prev {
                None if val >= 0.0 => out.push(vec![pt]),
                None => {}
                Some((_, prev_val)) if prev_val >= 0.0 && val >= 0.0 => {
                    if let Some(current) = out.last_mut() {
                        current.push(pt);
                    }
                }
                Some((prev_pt, prev_val)) if prev_val >= 0.0 => {
                    // leaving
                    let exit = crossing(prev_pt, prev_val, pt, val);
                    if let Some(current) = out.last_mut() {
                        current.push(exit);
                    }
                }
                Some((prev_pt, prev_val)) if val >= 0.0 => {
                    // entering
                    let entry = crossing(prev_pt, prev_val, pt, val);
                    out.push(vec![entry, pt]);
                }
                Some(_) => {}
            }

            prev = Some((pt, val));
        }
    }

    out
}

/// Point on segment `p → q` where the constraint value reaches zero.
#[inline]
fn crossing(p: Point, p_val: f64, q: Point, q_val: f64) -> Point {
    let t = -p_val / (q_val - p_val);
    p.lerp(q, t)
}

/// Clip all polylines to the page, one edge at a time.
pub fn clip_to_page(polylines: Vec<Polyline>, page: &Page, epsilon: f64) -> Vec<Polyline> {
    info!(
        "before clipping, had {} paths with {} total points",
        polylines.len(),
        point_count(&polylines)
    );

    page_half_planes(page, epsilon)
        .into_iter()
        .fold(polylines, |acc, plane| clip_polylines(&acc, plane))
}

// ============================================================================
// TESTS
// ============================================================================
