//! 2D affine transforms and the SVG `transform` attribute.
//!
//! Coefficients follow the SVG `matrix(a b c d e f)` layout:
//!
//! ```text
//! | a c e |   | x |
//! | b d f | · | y |
//! | 0 0 1 |   | 1 |
//! ```

use std::fmt;

use svgtypes::{TransformListParser, TransformListToken};
use tracing::trace;

use crate::error::{ConvertError, Result};
use crate::geometry::Point;

/// An affine map `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
///
/// Nothing guarantees invertibility: `scale(0)` is accepted and simply
/// collapses geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    #[inline]
    pub fn matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[inline]
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::matrix(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[inline]
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::matrix(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Matrix product `parent · child`: the result applies `child` first,
    /// then `parent`.
    pub fn compose(parent: &Transform, child: &Transform) -> Transform {
        Transform {
            a: parent.a * child.a + parent.c * child.b,
            b: parent.b * child.a + parent.d * child.b,
            c: parent.a * child.c + parent.c * child.d,
            d: parent.b * child.c + parent.d * child.d,
            e: parent.a * child.e + parent.c * child.f + parent.e,
            f: parent.b * child.e + parent.d * child.f + parent.f,
        }
    }

    /// Map a point through this transform.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Parse an SVG transform list.
    ///
    /// Functions compose left to right, so the leftmost function is the
    /// outermost one. An empty attribute is the identity.
    pub fn parse(value: &str) -> Result<Transform> {
        let mut result = Transform::IDENTITY;

        for token in TransformListParser::from(value) {
            let token = token.map_err(|e| ConvertError::MalformedTransform {
                value: value.to_string(),
                reason: e.to_string(),
            })?;

            let step = match token {
                TransformListToken::Matrix { a, b, c, d, e, f } => {
                    Transform::matrix(a, b, c, d, e, f)
                }
                TransformListToken::Translate { tx, ty } => Transform::translate(tx, ty),
                TransformListToken::Scale { sx, sy } => Transform::scale(sx, sy),
                TransformListToken::Rotate { .. } => return Err(unsupported("rotate", value)),
                TransformListToken::SkewX { .. } => return Err(unsupported("skewX", value)),
                TransformListToken::SkewY { .. } => return Err(unsupported("skewY", value)),
            };

            result = Transform::compose(&result, &step);
        }

        trace!(attribute = value, transform = %result, "parsed transform");
        Ok(result)
    }
}

fn unsupported(op: &'static str, value: &str) -> ConvertError {
    ConvertError::UnsupportedTransformOp {
        op,
        value: value.to_string(),
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix({} {} {} {} {} {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
