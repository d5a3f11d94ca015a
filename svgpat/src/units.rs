//! Physical lengths.
//!
//! Every length is resolved to inches. User units (and `px`) are fixed
//! at 90 per inch, the convention of the drawing tools that produce the
//! input files.

use std::str::FromStr;

use svgtypes::{Length, LengthUnit};

use crate::error::{ConvertError, Result};

/// User units (and pixels) per inch.
pub const USER_UNITS_PER_INCH: f64 = 90.0;

/// Parse a length attribute such as `"210mm"`, `"8.5in"` or `"300"` into
/// inches.
///
/// Font-relative units and percentages have no meaning without a style
/// context and are rejected, as are negative lengths.
pub fn parse_length(value: &str) -> Result<f64> {
    let inches = resolve_inches(value)?;
    if inches < 0.0 {
        return Err(malformed(value));
    }
    Ok(inches)
}

/// Parse a position attribute (`x`, `y`) into inches. Same units as
/// [`parse_length`], but the value may be negative.
pub fn parse_coordinate(value: &str) -> Result<f64> {
    resolve_inches(value)
}

fn resolve_inches(value: &str) -> Result<f64> {
    let length = Length::from_str(value.trim()).map_err(|_| malformed(value))?;
    if !length.number.is_finite() {
        return Err(malformed(value));
    }

    let per_inch = match length.unit {
        LengthUnit::None | LengthUnit::Px => USER_UNITS_PER_INCH,
        LengthUnit::Pt => USER_UNITS_PER_INCH / 1.25,
        LengthUnit::Pc => USER_UNITS_PER_INCH / 15.0,
        LengthUnit::Cm => USER_UNITS_PER_INCH / 35.43307,
        LengthUnit::Mm => USER_UNITS_PER_INCH / 3.543307,
        LengthUnit::In => 1.0,
        LengthUnit::Em => return Err(unsupported(value, "em")),
        LengthUnit::Ex => return Err(unsupported(value, "ex")),
        LengthUnit::Percent => return Err(unsupported(value, "%")),
    };

    Ok(length.number / per_inch)
}

fn malformed(value: &str) -> ConvertError {
    ConvertError::MalformedLength {
        value: value.to_string(),
    }
}

fn unsupported(value: &str, unit: &'static str) -> ConvertError {
    ConvertError::UnsupportedUnit {
        value: value.to_string(),
        unit,
    }
}

/// Convert inches back into user units.
#[inline]
pub fn to_user_units(inches: f64) -> f64 {
    inches * USER_UNITS_PER_INCH
}
