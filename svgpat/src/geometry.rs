//! Core geometry types for svgpat.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = lets you print with `{:?}`
//! - `Clone` / `Copy` = a `Point` is two floats, so copying it is free
//! - `PartialEq` = can compare with `==`
//!
//! Points are just numbers. Which space they live in (local user units
//! vs. fully transformed page inches) depends on the pipeline stage.

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// An ordered run of connected points.
///
/// Produced by a moveto, extended by lines and flattened curves, and
/// never mutated again once it has been finalized.
pub type Polyline = Vec<Point>;

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation: `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            t * (other.x - self.x) + self.x,
            t * (other.y - self.y) + self.y,
        )
    }

    /// Point reflection of `other` through `self` (`2·self − other`).
    #[inline]
    pub fn reflect(&self, other: Point) -> Point {
        Point::new(2.0 * self.x - other.x, 2.0 * self.y - other.y)
    }

    /// Component-wise sum, used to resolve relative path coordinates.
    #[inline]
    pub fn offset(&self, by: Point) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }
}

/// Total number of points across a list of polylines.
pub fn point_count(polylines: &[Polyline]) -> usize {
    polylines.iter().map(Vec::len).sum()
}

// ============================================================================
// TESTS
// ============================================================================
