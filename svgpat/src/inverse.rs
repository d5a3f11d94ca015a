//! Pattern → SVG, for previewing `.pat` files.
//!
//! Reads `N<n>G<code>X<x>Y<y>` records, keeps `G00` (move) and `G01`
//! (line), and writes an SVG sized to the drawing's bounding box plus a
//! quarter-inch margin. Pattern y grows upward, SVG y downward, so y is
//! negated on the way in.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::geometry::Point;

/// Margin added around the drawing, in inches.
pub const MARGIN: f64 = 0.25;

static MOTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^N\d+G(\d+)X(-?[\d.]+)Y(-?[\d.]+)$").expect("invalid motion line regex")
});

static END_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^N\d+M02$").expect("invalid end line regex"));

/// One drawing step, in SVG orientation (y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternStep {
    Move(Point),
    Line(Point),
}

impl PatternStep {
    pub fn point(&self) -> Point {
        match *self {
            PatternStep::Move(p) | PatternStep::Line(p) => p,
        }
    }
}

/// A pattern line that was skipped.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternIssue {
    #[error("unrecognized line {line_no}: '{text}'")]
    UnrecognizedPatternLine { line_no: usize, text: String },

    #[error("unknown G command {code} on line {line_no}")]
    UnknownMotionCode { line_no: usize, code: u32 },
}

/// Steps read from a pattern, plus everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPattern {
    pub steps: Vec<PatternStep>,
    pub issues: Vec<PatternIssue>,
}

/// Parse pattern text. Never fails: bad lines are logged, recorded and
/// skipped.
pub fn parse_pattern(text: &str) -> ParsedPattern {
    let mut parsed = ParsedPattern::default();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');

        if line.trim().is_empty() {
            continue;
        }
        if END_LINE.is_match(line) {
            debug!(line_no, "end of program");
            continue;
        }

        match parse_motion(line) {
            Some((0, p)) => parsed.steps.push(PatternStep::Move(p)),
            Some((1, p)) => parsed.steps.push(PatternStep::Line(p)),
            Some((code, _)) => {
                let issue = PatternIssue::UnknownMotionCode { line_no, code };
                warn!("{}", issue);
                parsed.issues.push(issue);
            }
            None => {
                let issue = PatternIssue::UnrecognizedPatternLine {
                    line_no,
                    text: line.to_string(),
                };
                warn!("{}", issue);
                parsed.issues.push(issue);
            }
        }
    }

    parsed
}

/// Match one motion record; y comes back negated into SVG orientation.
fn parse_motion(line: &str) -> Option<(u32, Point)> {
    let caps = MOTION_LINE.captures(line)?;
    let code = caps[1].parse::<u32>().ok()?;
    let x = caps[2].parse::<f64>().ok()?;
    let y = caps[3].parse::<f64>().ok()?;
    // Keep negative zero out of the rendered path.
    Some((code, Point::new(x + 0.0, 0.0 - y)))
}

/// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
pub type Bounds = (f64, f64, f64, f64);

/// Bounding box of all steps grown by [`MARGIN`]. An empty drawing gets a
/// margin-sized box around the origin.
pub fn padded_bounds(steps: &[PatternStep]) -> Bounds {
    let (min_x, min_y, max_x, max_y) = if steps.is_empty() {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        steps.iter().map(PatternStep::point).fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            },
        )
    };

    (min_x - MARGIN, min_y - MARGIN, max_x + MARGIN, max_y + MARGIN)
}

/// Render steps as an SVG document.
pub fn steps_to_svg(steps: &[PatternStep]) -> String {
    let (min_x, min_y, max_x, max_y) = padded_bounds(steps);
    let width = max_x - min_x;
    let height = max_y - min_y;

    let d = steps
        .iter()
        .map(|step| match step {
            PatternStep::Move(p) => format!("M {} {}", p.x, p.y),
            PatternStep::Line(p) => format!("L {} {}", p.x, p.y),
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        concat!(
            "<?xml version=\"1.0\" standalone=\"no\"?>\n",
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
            "<svg width=\"{w}in\" height=\"{h}in\" viewBox=\"{min_x} {min_y} {w} {h}\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">\n",
            "<path d=\"{d}\" style=\"stroke:#000;stroke-width:0.01;fill:none\" />\n",
            "</svg>\n",
        ),
        w = width,
        h = height,
        min_x = min_x,
        min_y = min_y,
        d = d,
    )
}

/// Parse pattern text and render it as SVG in one go.
pub fn pattern_to_svg(text: &str) -> (String, Vec<PatternIssue>) {
    let parsed = parse_pattern(text);
    (steps_to_svg(&parsed.steps), parsed.issues)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "N1G00X0.000Y0.000\r\nN2G01X1.000Y0.000\r\nN3G01X1.000Y1.000\r\nN4G01X0.000Y1.000\r\nN5G01X0.000Y0.000\r\nN6M02\r\n";

    #[test]
    fn parses_moves_and_lines_with_flipped_y() {
        let parsed = parse_pattern(SQUARE);
        assert!(parsed.issues.is_empty(), "{:?}", parsed.issues);
        assert_eq!(parsed.steps.len(), 5);
        assert_eq!(parsed.steps[0], PatternStep::Move(Point::new(0.0, 0.0)));
        assert_eq!(parsed.steps[2], PatternStep::Line(Point::new(1.0, -1.0)));
    }

    #[test]
    fn negative_coordinates_are_accepted() {
        let parsed = parse_pattern("N1G00X-1.500Y-0.250\n");
        assert_eq!(parsed.steps, vec![PatternStep::Move(Point::new(-1.5, 0.25))]);
    }

    #[test]
    fn zero_never_prints_negative() {
        let (svg, _) = pattern_to_svg("N1G00X-0.000Y0.000\nN2G01X1.000Y0.000\n");
        assert!(svg.contains(r#"d="M 0 0 L 1 0""#), "{svg}");
    }

    #[test]
    fn bad_lines_are_skipped_and_reported() {
        let parsed = parse_pattern("N1G00X0Y0\nhello\nN2G02X1Y1\nN3G01X1.2.3Y0\n\nN4G01X2Y0\n");
        assert_eq!(parsed.steps.len(), 2);
        assert_eq!(
            parsed.issues,
            vec![
                PatternIssue::UnrecognizedPatternLine { line_no: 2, text: "hello".into() },
                PatternIssue::UnknownMotionCode { line_no: 3, code: 2 },
                PatternIssue::UnrecognizedPatternLine { line_no: 4, text: "N3G01X1.2.3Y0".into() },
            ]
        );
    }

    #[test]
    fn bounds_include_margin() {
        let parsed = parse_pattern(SQUARE);
        let (min_x, min_y, max_x, max_y) = padded_bounds(&parsed.steps);
        assert_eq!((min_x, min_y, max_x, max_y), (-0.25, -1.25, 1.25, 0.25));
    }

    #[test]
    fn empty_drawing_bounds() {
        assert_eq!(padded_bounds(&[]), (-0.25, -0.25, 0.25, 0.25));
    }

    #[test]
    fn svg_document_shape() {
        let (svg, issues) = pattern_to_svg(SQUARE);
        assert!(issues.is_empty());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"width="1.5in" height="1.5in""#), "{svg}");
        assert!(svg.contains(r#"viewBox="-0.25 -1.25 1.5 1.5""#), "{svg}");
        assert!(svg.contains(r#"d="M 0 0 L 1 0 L 1 -1 L 0 -1 L 0 0""#), "{svg}");
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn svg_document_is_complete() {
        let svg = steps_to_svg(&[]);
        let lines: Vec<&str> = svg.lines().collect();
        assert_eq!(lines.len(), 5, "{svg}");
        assert!(lines[1].starts_with("<!DOCTYPE svg"));
        assert_eq!(
            lines[2],
            r#"<svg width="0.5in" height="0.5in" viewBox="-0.25 -0.25 0.5 0.5" version="1.1" xmlns="http://www.w3.org/2000/svg">"#
        );
        assert_eq!(lines[3], r#"<path d="" style="stroke:#000;stroke-width:0.01;fill:none" />"#);
        assert!(svg.ends_with("</svg>\n"));
    }
}
