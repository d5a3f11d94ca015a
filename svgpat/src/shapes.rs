//! Shape adapters: primitive elements expressed as path operations.
//!
//! Only `<rect>` is converted. The other basic shapes are reported and
//! skipped so the rest of the document still converts.

use tracing::warn;

use crate::error::Result;
use crate::geometry::Point;
use crate::path::PathInterpreter;
use crate::units::{parse_coordinate, parse_length, to_user_units};
use crate::walker::Attributes;

/// Basic shapes that are recognized but not converted.
pub const UNSUPPORTED_SHAPES: &[&str] = &["circle", "ellipse", "line", "polyline", "polygon"];

pub fn is_unsupported_shape(name: &str) -> bool {
    UNSUPPORTED_SHAPES.contains(&name)
}

/// An axis-aligned rectangle in local user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Read a `<rect>` element's geometry.
    ///
    /// Lengths with units go through inches and back into user units, so
    /// `width="1in"` is 90 user units. The origin may be negative, the size
    /// may not. Returns `None` (with a warning) when `width` or `height` is
    /// missing.
    pub fn from_attributes(attrs: &Attributes) -> Result<Option<Rect>> {
        let (Some(width), Some(height)) = (attrs.get("width"), attrs.get("height")) else {
            warn!("rect without width/height skipped");
            return Ok(None);
        };

        if attrs.get("rx").is_some() || attrs.get("ry").is_some() {
            warn!("rounded rect corners are not supported, drawing square corners");
        }

        let coordinate = |name: &str| -> Result<f64> {
            match attrs.get(name) {
                Some(value) => Ok(to_user_units(parse_coordinate(value)?)),
                None => Ok(0.0),
            }
        };

        Ok(Some(Rect {
            x: coordinate("x")?,
            y: coordinate("y")?,
            width: to_user_units(parse_length(width)?),
            height: to_user_units(parse_length(height)?),
        }))
    }

    /// Corners in drawing order, starting at `(x, y)`.
    pub fn corners(&self) -> [Point; 4] {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        [
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ]
    }

    /// Draw the rectangle as a closed path.
    pub fn trace(&self, path: &mut PathInterpreter<'_>) {
        let [first, rest @ ..] = self.corners();
        path.move_to(first);
        for corner in rest {
            path.line_to(corner);
        }
        path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Accumulator;
    use crate::error::ConvertError;
    use crate::flatten::Flattening;
    use crate::transform::Transform;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn rect_reads_user_units() {
        let rect = Rect::from_attributes(&attrs(&[
            ("x", "10"),
            ("y", "20"),
            ("width", "30"),
            ("height", "40"),
        ]))
        .unwrap()
        .unwrap();
        assert!((rect.x - 10.0).abs() < 1e-9);
        assert!((rect.y - 20.0).abs() < 1e-9);
        assert!((rect.width - 30.0).abs() < 1e-9);
        assert!((rect.height - 40.0).abs() < 1e-9);
    }

    #[test]
    fn rect_physical_size_becomes_user_units() {
        let rect = Rect::from_attributes(&attrs(&[("width", "1in"), ("height", "0.5in")]))
            .unwrap()
            .unwrap();
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert!((rect.width - 90.0).abs() < 1e-9);
        assert!((rect.height - 45.0).abs() < 1e-9);
    }

    #[test]
    fn rect_origin_may_be_negative() {
        let rect = Rect::from_attributes(&attrs(&[
            ("x", "-2"),
            ("y", "-0.5in"),
            ("width", "5"),
            ("height", "5"),
        ]))
        .unwrap()
        .unwrap();
        assert!((rect.x + 2.0).abs() < 1e-9);
        assert!((rect.y + 45.0).abs() < 1e-9);
    }

    #[test]
    fn rect_size_may_not_be_negative() {
        let err = Rect::from_attributes(&attrs(&[("width", "-5"), ("height", "5")])).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedLength { .. }));
    }

    #[test]
    fn rect_without_size_is_skipped() {
        assert_eq!(Rect::from_attributes(&attrs(&[("width", "5")])).unwrap(), None);
    }

    #[test]
    fn rect_with_bad_length_is_fatal() {
        let err = Rect::from_attributes(&attrs(&[("width", "5em"), ("height", "5")])).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedUnit { .. }));
    }

    #[test]
    fn rect_traces_closed_four_corner_path() {
        let rect = Rect { x: 1.0, y: 2.0, width: 3.0, height: 4.0 };
        let mut acc = Accumulator::new();
        let mut path = PathInterpreter::new(Transform::IDENTITY, Flattening::default(), &mut acc);
        rect.trace(&mut path);
        path.finish();

        let polylines = acc.finish();
        assert_eq!(
            polylines,
            vec![vec![
                Point::new(1.0, 2.0),
                Point::new(4.0, 2.0),
                Point::new(4.0, 6.0),
                Point::new(1.0, 6.0),
                Point::new(1.0, 2.0),
            ]]
        );
    }

    #[test]
    fn unsupported_shape_names() {
        assert!(is_unsupported_shape("circle"));
        assert!(is_unsupported_shape("polyline"));
        assert!(!is_unsupported_shape("rect"));
        assert!(!is_unsupported_shape("path"));
    }
}
