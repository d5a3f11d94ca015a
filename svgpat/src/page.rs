//! The physical page and the transform into controller space.
//!
//! The controller works in inches with y growing *upward* and the origin
//! at the bottom-left corner of the page. SVG user space has y growing
//! downward from the top-left corner, so the page transform always flips
//! the vertical axis and shifts it by the page height.

use std::str::FromStr;

use svgtypes::ViewBox;
use tracing::info;

use crate::error::{ConvertError, Result};
use crate::transform::Transform;
use crate::units::{USER_UNITS_PER_INCH, parse_length};

/// Page size in inches. Clipping keeps geometry inside `[0, width] × [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub width: f64,
    pub height: f64,
}

impl Default for Page {
    /// One inch square, used when the document does not say.
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Page {
    /// Establish the page from the root `<svg>` element's attributes.
    ///
    /// Returns the page size and the transform from root user space into
    /// controller inches.
    pub fn from_root_attributes(
        width: Option<&str>,
        height: Option<&str>,
        view_box: Option<&str>,
    ) -> Result<(Page, Transform)> {
        let width = resolve_dimension("width", width)?;
        let height = resolve_dimension("height", height)?;
        let page = Page { width, height };

        let transform = match view_box {
            Some(value) => {
                let vb = ViewBox::from_str(value.trim()).map_err(|_| {
                    ConvertError::MalformedViewBox {
                        value: value.to_string(),
                    }
                })?;
                page.view_box_transform(&vb)
            }
            None => page.user_unit_transform(),
        };

        Ok((page, transform))
    }

    /// Map the viewBox rectangle onto the page, flipping y.
    fn view_box_transform(&self, vb: &ViewBox) -> Transform {
        let sx = self.width / vb.w;
        let sy = self.height / vb.h;
        Transform::matrix(sx, 0.0, 0.0, -sy, -sx * vb.x, sy * vb.y + self.height)
    }

    /// Without a viewBox one user unit is one px (1/90 in). The same
    /// y-up flip applies as in the viewBox case.
    fn user_unit_transform(&self) -> Transform {
        let s = 1.0 / USER_UNITS_PER_INCH;
        Transform::matrix(s, 0.0, 0.0, -s, 0.0, self.height)
    }
}

fn resolve_dimension(name: &str, value: Option<&str>) -> Result<f64> {
    match value {
        Some(value) => {
            let inches = parse_length(value)?;
            info!("{}: {}in", name, inches);
            Ok(inches)
        }
        None => {
            info!("no {} on svg element, assuming 1in", name);
            Ok(1.0)
        }
    }
}
