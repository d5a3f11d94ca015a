//! Pattern (`.pat`) emission.
//!
//! The controller reads one record per line:
//!
//! ```text
//! N1G00X0.000Y1.000
//! N2G01X1.000Y1.000
//! N3M02
//! ```
//!
//! `G00` is a rapid (pen up) move to the first point of a polyline, `G01`
//! a linear move to each following point, and `M02` ends the program.
//! Every record ends with CR LF.

use std::fmt;
use std::io::{self, Write};

use crate::error::{ConvertError, Result};
use crate::geometry::{Point, Polyline};

/// Record terminator expected by the controller.
pub const LINE_ENDING: &str = "\r\n";

/// A coordinate pair rounded to thousandths of an inch.
///
/// Values are stored as integer thousandths, so two points are equal
/// exactly when their formatted text is equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantizedPoint {
    pub x: i64,
    pub y: i64,
}

/// Round a value already scaled to thousandths, ties away from zero.
///
/// `None` when the result does not fit an `i64` (or is not finite).
#[inline]
pub fn round_scaled(scaled: f64) -> Option<i64> {
    let rounded = scaled.round();
    // i64::MAX as f64 is 2^63, one past the largest value.
    if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Some(rounded as i64)
    } else {
        None
    }
}

fn quantize(value: f64) -> Result<i64> {
    round_scaled(value * 1000.0).ok_or(ConvertError::CoordinateOutOfRange { value })
}

impl QuantizedPoint {
    pub fn from_point(p: Point) -> Result<Self> {
        Ok(Self {
            x: quantize(p.x)?,
            y: quantize(p.y)?,
        })
    }
}

/// Write integer thousandths as a fixed three-decimal number.
fn write_thousandths(f: &mut fmt::Formatter<'_>, value: i64) -> fmt::Result {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    write!(f, "{}{}.{:03}", sign, abs / 1000, abs % 1000)
}

impl fmt::Display for QuantizedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("X")?;
        write_thousandths(f, self.x)?;
        f.write_str("Y")?;
        write_thousandths(f, self.y)
    }
}

/// Motion codes understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCode {
    /// `G00`: move without cutting/drawing.
    Rapid,
    /// `G01`: linear interpolation.
    Linear,
}

impl MotionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionCode::Rapid => "G00",
            MotionCode::Linear => "G01",
        }
    }
}

/// One line of pattern output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRecord {
    Motion {
        line: u32,
        code: MotionCode,
        target: QuantizedPoint,
    },
    EndOfProgram {
        line: u32,
    },
}

impl fmt::Display for PatternRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternRecord::Motion { line, code, target } => {
                write!(f, "N{}{}{}", line, code.as_str(), target)
            }
            PatternRecord::EndOfProgram { line } => write!(f, "N{}M02", line),
        }
    }
}

/// Quantize a polyline and collapse consecutive duplicates.
pub fn quantize_polyline(polyline: &[Point]) -> Result<Vec<QuantizedPoint>> {
    let mut simple = polyline
        .iter()
        .map(|&p| QuantizedPoint::from_point(p))
        .collect::<Result<Vec<_>>>()?;
    simple.dedup();
    Ok(simple)
}

/// Records plus counts of what survived quantization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub records: Vec<PatternRecord>,
    pub polylines: usize,
    pub points: usize,
}

/// Turn final polylines into numbered pattern records.
///
/// Polylines that quantize to fewer than two distinct consecutive points
/// are dropped. Line numbers start at 1 and the `M02` record takes the
/// next free number. A coordinate too large to print exactly is an error.
pub fn emit_program(polylines: &[Polyline]) -> Result<Program> {
    let mut records = Vec::new();
    let mut line: u32 = 1;
    let mut kept_polylines = 0;
    let mut kept_points = 0;

    for polyline in polylines {
        let simple = quantize_polyline(polyline)?;
        if simple.len() < 2 {
            continue;
        }
        kept_polylines += 1;
        kept_points += simple.len();

        for (i, target) in simple.into_iter().enumerate() {
            let code = if i == 0 { MotionCode::Rapid } else { MotionCode::Linear };
            records.push(PatternRecord::Motion { line, code, target });
            line += 1;
        }
    }

    records.push(PatternRecord::EndOfProgram { line });

    Ok(Program {
        records,
        polylines: kept_polylines,
        points: kept_points,
    })
}

/// Write records, each terminated by [`LINE_ENDING`].
pub fn write_pattern<W: Write>(records: &[PatternRecord], out: &mut W) -> io::Result<()> {
    for record in records {
        write!(out, "{}{}", record, LINE_ENDING)?;
    }
    out.flush()
}

/// Render records into a `String`.
#[cfg(test)]
pub(crate) fn pattern_to_string(records: &[PatternRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}{}", r, LINE_ENDING))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
