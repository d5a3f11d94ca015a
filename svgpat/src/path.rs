//! SVG path data (`d` attribute) parsing and interpretation.
//!
//! Supported commands: `M L H V C S Z` in absolute and relative forms.
//! Arcs and quadratic curves are rejected.
//!
//! Parsing is split in two:
//! - [`PathCursor`] scans whitespace, separators, command letters and numbers.
//! - [`PathInterpreter`] is the drawing state machine. It holds the current
//!   point, the previous second control point and the active transform,
//!   and has one method per command.
//!
//! ## Implicit repetition
//!
//! After a command's first (required) coordinate group, more groups repeat
//! the command (`M` repeats as `L`). A failure inside a repeated group only
//! ends the repetition, and the partially read group is dropped. A failure in
//! the required group is fatal.

use tracing::{debug, warn};

use crate::accumulator::Accumulator;
use crate::error::{ConvertError, Result};
use crate::flatten::{Flattening, cubic, flatten_cubic};
use crate::geometry::Point;
use crate::transform::Transform;

// ============================================================================
// CURSOR
// ============================================================================

/// Cursor over path data.
pub struct PathCursor<'a> {
    text: &'a str,
    data: &'a [u8],
    pos: usize,
}

#[inline]
fn is_wsp(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

impl<'a> PathCursor<'a> {
    pub fn new(data: &'a str) -> Self {
        Self {
            text: data,
            data: data.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub fn skip_wsp(&mut self) {
        while self.peek().is_some_and(is_wsp) {
            self.pos += 1;
        }
    }

    /// Skip `wsp* ,? wsp*`.
    pub fn skip_wsp_comma_wsp(&mut self) {
        self.skip_wsp();
        if self.peek() == Some(b',') {
            self.pos += 1;
        }
        self.skip_wsp();
    }

    /// Take the next byte as a command letter, skipping leading whitespace.
    pub fn next_command(&mut self) -> Option<(char, usize)> {
        self.skip_wsp();
        let offset = self.pos;
        let c = self.text[offset..].chars().next()?;
        self.pos += c.len_utf8();
        Some((c, offset))
    }

    /// Read `[+-]? (digits? '.' digits | digits '.'? digits?) ([eE] [+-]? digits)?`.
    ///
    /// On failure the cursor does not move. An exponent marker not followed
    /// by digits is left unconsumed.
    pub fn number(&mut self) -> Result<f64> {
        let start = self.pos;
        let mut i = start;
        let data = self.data;
        let at = |i: usize| data.get(i).copied();

        if matches!(at(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let int_start = i;
        while at(i).is_some_and(|b| b.is_ascii_digit()) {
            i += 1;
        }
        let mut digits = i - int_start;
        if at(i) == Some(b'.') {
            i += 1;
            let frac_start = i;
            while at(i).is_some_and(|b| b.is_ascii_digit()) {
                i += 1;
            }
            digits += i - frac_start;
        }
        if digits == 0 {
            return Err(self.malformed(start));
        }

        if matches!(at(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            if matches!(at(j), Some(b'+' | b'-')) {
                j += 1;
            }
            let exp_start = j;
            while at(j).is_some_and(|b| b.is_ascii_digit()) {
                j += 1;
            }
            if j > exp_start {
                i = j;
            }
        }

        let value = self.text[start..i]
            .parse::<f64>()
            .map_err(|_| self.malformed(start))?;
        self.pos = i;
        Ok(value)
    }

    /// Read `number comma-wsp? number`.
    pub fn pair(&mut self) -> Result<Point> {
        let x = self.number()?;
        self.skip_wsp_comma_wsp();
        let y = self.number()?;
        Ok(Point::new(x, y))
    }

    fn malformed(&self, offset: usize) -> ConvertError {
        let end = (offset + 12).min(self.data.len());
        ConvertError::MalformedNumber {
            offset,
            near: String::from_utf8_lossy(&self.data[offset..end]).into_owned(),
        }
    }
}

// ============================================================================
// INTERPRETER
// ============================================================================

/// Drawing state for one path-bearing element.
///
/// Coordinates are local (pre-transform). Every point handed to the
/// accumulator has been mapped through `transform`.
pub struct PathInterpreter<'a> {
    transform: Transform,
    flattening: Flattening,
    accumulator: &'a mut Accumulator,
    /// Current point in local coordinates.
    current: Point,
    /// Second control point of the previous command, or the current point
    /// when the previous command was not a cubic.
    prev_ctrl2: Point,
    /// Local start of the open subpath, for closepath.
    subpath_start: Option<Point>,
}

impl<'a> PathInterpreter<'a> {
    pub fn new(transform: Transform, flattening: Flattening, accumulator: &'a mut Accumulator) -> Self {
        Self {
            transform,
            flattening,
            accumulator,
            current: Point::ORIGIN,
            prev_ctrl2: Point::ORIGIN,
            subpath_start: None,
        }
    }

    pub fn move_to(&mut self, p: Point) {
        self.accumulator.move_to(self.transform.apply(p));
        self.current = p;
        self.prev_ctrl2 = p;
        self.subpath_start = Some(p);
    }

    pub fn line_to(&mut self, p: Point) {
        self.ensure_subpath();
        self.accumulator.line_to(self.transform.apply(p));
        self.current = p;
        self.prev_ctrl2 = p;
    }

    pub fn horizontal_to(&mut self, x: f64) {
        self.line_to(Point::new(x, self.current.y));
    }

    pub fn vertical_to(&mut self, y: f64) {
        self.line_to(Point::new(self.current.x, y));
    }

    pub fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.ensure_subpath();
        let curve = cubic(self.current, ctrl1, ctrl2, to);
        let accumulator = &mut *self.accumulator;
        flatten_cubic(&curve, &self.transform, &self.flattening, &mut |p| {
            accumulator.line_to(p)
        });
        self.current = to;
        self.prev_ctrl2 = ctrl2;
    }

    /// Cubic whose first control point reflects the previous second control
    /// point through the current point.
    ///
    /// Only a directly preceding `C`/`S` leaves a distinct `prev_ctrl2`;
    /// otherwise the reflection is the current point itself.
    pub fn smooth_curve_to(&mut self, ctrl2: Point, to: Point) {
        let ctrl1 = self.current.reflect(self.prev_ctrl2);
        self.curve_to(ctrl1, ctrl2, to);
    }

    pub fn close_path(&mut self) {
        if let Some(start) = self.subpath_start {
            self.accumulator.close_path();
            self.current = start;
            self.prev_ctrl2 = start;
        }
    }

    /// Final synthetic moveto: finalize the open polyline.
    pub fn finish(self) {
        self.accumulator.end_polyline();
    }

    fn ensure_subpath(&mut self) {
        if self.subpath_start.is_none() {
            warn!(
                x = self.current.x,
                y = self.current.y,
                "path drawing command before moveto, starting at current point"
            );
            self.move_to(self.current);
        }
    }

    /// Resolve a coordinate pair that may be relative to the current point.
    #[inline]
    fn resolve(&self, p: Point, relative: bool) -> Point {
        if relative { self.current.offset(p) } else { p }
    }

    /// Interpret a complete `d` attribute and finalize the last polyline.
    pub fn run(mut self, data: &str) -> Result<()> {
        let mut cursor = PathCursor::new(data);

        while let Some((command, offset)) = cursor.next_command() {
            let relative = command.is_ascii_lowercase();

            match command.to_ascii_uppercase() {
                'M' | 'L' => {
                    cursor.skip_wsp();
                    let p = self.resolve(cursor.pair()?, relative);
                    if command.eq_ignore_ascii_case(&'M') {
                        self.move_to(p);
                    } else {
                        self.line_to(p);
                    }
                    self.repeat(&mut cursor, command, |interp, cursor| {
                        let p = interp.resolve(cursor.pair()?, relative);
                        interp.line_to(p);
                        Ok(())
                    });
                }
                'H' => {
                    let horizontal = |interp: &mut Self, cursor: &mut PathCursor| -> Result<()> {
                        let mut x = cursor.number()?;
                        if relative {
                            x += interp.current.x;
                        }
                        interp.horizontal_to(x);
                        Ok(())
                    };
                    cursor.skip_wsp();
                    horizontal(&mut self, &mut cursor)?;
                    self.repeat(&mut cursor, command, horizontal);
                }
                'V' => {
                    let vertical = |interp: &mut Self, cursor: &mut PathCursor| -> Result<()> {
                        let mut y = cursor.number()?;
                        if relative {
                            y += interp.current.y;
                        }
                        interp.vertical_to(y);
                        Ok(())
                    };
                    cursor.skip_wsp();
                    vertical(&mut self, &mut cursor)?;
                    self.repeat(&mut cursor, command, vertical);
                }
                'C' => {
                    let curve = |interp: &mut Self, cursor: &mut PathCursor| -> Result<()> {
                        let ctrl1 = cursor.pair()?;
                        cursor.skip_wsp_comma_wsp();
                        let ctrl2 = cursor.pair()?;
                        cursor.skip_wsp_comma_wsp();
                        let to = cursor.pair()?;
                        interp.curve_to(
                            interp.resolve(ctrl1, relative),
                            interp.resolve(ctrl2, relative),
                            interp.resolve(to, relative),
                        );
                        Ok(())
                    };
                    cursor.skip_wsp();
                    curve(&mut self, &mut cursor)?;
                    self.repeat(&mut cursor, command, curve);
                }
                'S' => {
                    let smooth = |interp: &mut Self, cursor: &mut PathCursor| -> Result<()> {
                        let ctrl2 = cursor.pair()?;
                        cursor.skip_wsp_comma_wsp();
                        let to = cursor.pair()?;
                        interp.smooth_curve_to(
                            interp.resolve(ctrl2, relative),
                            interp.resolve(to, relative),
                        );
                        Ok(())
                    };
                    cursor.skip_wsp();
                    smooth(&mut self, &mut cursor)?;
                    self.repeat(&mut cursor, command, smooth);
                }
                'Z' => self.close_path(),
                _ => return Err(ConvertError::UnsupportedPathCommand { command, offset }),
            }
        }

        self.finish();
        Ok(())
    }

    /// Apply `group` for each further coordinate group after a command.
    ///
    /// Stops at the end of data or at the first group that fails to parse.
    /// A group that fails before consuming anything (the next command
    /// letter, typically) ends the repetition silently.
    fn repeat<'d, F>(&mut self, cursor: &mut PathCursor<'d>, command: char, mut group: F)
    where
        F: FnMut(&mut Self, &mut PathCursor<'d>) -> Result<()>,
    {
        loop {
            cursor.skip_wsp_comma_wsp();
            if cursor.at_end() {
                break;
            }
            let start = cursor.position();
            if let Err(err) = group(self, cursor) {
                if cursor.position() != start {
                    debug!(%command, offset = start, error = %err, "discarding incomplete coordinate group");
                }
                break;
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polyline;

    fn run_with(data: &str, transform: Transform) -> Result<Vec<Polyline>> {
        let mut acc = Accumulator::new();
        PathInterpreter::new(transform, Flattening::default(), &mut acc).run(data)?;
        Ok(acc.finish())
    }

    fn run(data: &str) -> Vec<Polyline> {
        run_with(data, Transform::IDENTITY).unwrap()
    }

    fn pts(coords: &[(f64, f64)]) -> Polyline {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    // ---- cursor ----

    #[test]
    fn cursor_reads_number_forms() {
        for (text, expected) in [
            ("10", 10.0),
            ("-2.5", -2.5),
            ("+.5", 0.5),
            ("3.", 3.0),
            ("1e3", 1000.0),
            ("1.5E-1", 0.15),
        ] {
            let mut c = PathCursor::new(text);
            assert_eq!(c.number().unwrap(), expected, "{text}");
            assert!(c.at_end(), "{text} should be fully consumed");
        }
    }

    #[test]
    fn cursor_splits_adjacent_numbers() {
        let mut c = PathCursor::new("1.5.5-3");
        assert_eq!(c.number().unwrap(), 1.5);
        assert_eq!(c.number().unwrap(), 0.5);
        assert_eq!(c.number().unwrap(), -3.0);
    }

    #[test]
    fn cursor_leaves_dangling_exponent_marker() {
        let mut c = PathCursor::new("2e");
        assert_eq!(c.number().unwrap(), 2.0);
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn cursor_failure_does_not_move() {
        let mut c = PathCursor::new("-.x");
        assert!(matches!(c.number(), Err(ConvertError::MalformedNumber { offset: 0, .. })));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn cursor_pair_separators() {
        for text in ["1,2", "1 2", "1 , 2", "1-2"] {
            let mut c = PathCursor::new(text);
            let p = c.pair().unwrap();
            assert_eq!(p.x, 1.0, "{text}");
            assert_eq!(p.y.abs(), 2.0, "{text}");
        }
    }

    // ---- commands ----

    #[test]
    fn absolute_lines() {
        assert_eq!(run("M0,0 L10,0 L10,10"), vec![pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])]);
    }

    #[test]
    fn relative_lines_accumulate() {
        assert_eq!(
            run("m1,1 l2,0 0,2 -2,0 z"),
            vec![pts(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0), (1.0, 1.0)])]
        );
    }

    #[test]
    fn moveto_repeats_as_lineto() {
        assert_eq!(run("M0 0 5 0 5 5"), vec![pts(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)])]);
        assert_eq!(run("m1 1 1 0"), vec![pts(&[(1.0, 1.0), (2.0, 1.0)])]);
    }

    #[test]
    fn horizontal_and_vertical() {
        assert_eq!(
            run("M1,1 H4 V3 h-1 v-1 H0 2"),
            vec![pts(&[(1.0, 1.0), (4.0, 1.0), (4.0, 3.0), (3.0, 3.0), (3.0, 2.0), (0.0, 2.0), (2.0, 2.0)])]
        );
    }

    #[test]
    fn each_moveto_starts_a_polyline() {
        let out = run("M0,0 L1,0 M5,5 L6,5 M9,9");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], pts(&[(0.0, 0.0), (1.0, 0.0)]));
        assert_eq!(out[1], pts(&[(5.0, 5.0), (6.0, 5.0)]));
        assert_eq!(out[2], pts(&[(9.0, 9.0)]));
    }

    #[test]
    fn close_then_relative_move_uses_subpath_start() {
        let out = run("M10,10 l5,0 l0,5 z m1,1 l1,0");
        assert_eq!(out[1], pts(&[(11.0, 11.0), (12.0, 11.0)]));
    }

    #[test]
    fn compact_syntax() {
        assert_eq!(run("M0-1L2.5.5"), vec![pts(&[(0.0, -1.0), (2.5, 0.5)])]);
    }

    #[test]
    fn transform_applies_to_stored_points() {
        let out = run_with("M1,1 L2,1", Transform::translate(10.0, 0.0)).unwrap();
        assert_eq!(out, vec![pts(&[(11.0, 1.0), (12.0, 1.0)])]);
    }

    #[test]
    fn curve_ends_at_endpoint() {
        let out = run("M0,0 C0,1 1,1 1,0");
        let last = *out[0].last().unwrap();
        assert!((last.x - 1.0).abs() < 1e-12 && last.y.abs() < 1e-12);
        assert!(out[0].len() > 2);
    }

    #[test]
    fn relative_curve_is_relative_to_command_start() {
        let abs = run("M1,1 C1,2 2,2 2,1");
        let rel = run("M1,1 c0,1 1,1 1,0");
        assert_eq!(abs, rel);
    }

    #[test]
    fn repeated_curves() {
        let out = run("M0,0 C0,1 1,1 1,0 1,-1 2,-1 2,0");
        let last = *out[0].last().unwrap();
        assert!((last.x - 2.0).abs() < 1e-12 && last.y.abs() < 1e-12);
    }

    #[test]
    fn smooth_after_curve_reflects_control_point() {
        let smooth = run("M0,0 C0,1 1,1 1,0 S2,-1 2,0");
        let explicit = run("M0,0 C0,1 1,1 1,0 C1,-1 2,-1 2,0");
        assert_eq!(smooth, explicit);
    }

    #[test]
    fn smooth_after_line_uses_current_point() {
        let smooth = run("M0,0 L1,0 S2,1 3,0");
        let explicit = run("M0,0 L1,0 C1,0 2,1 3,0");
        assert_eq!(smooth, explicit);
    }

    #[test]
    fn line_before_move_starts_at_origin() {
        assert_eq!(run("L3,4"), vec![pts(&[(0.0, 0.0), (3.0, 4.0)])]);
    }

    #[test]
    fn incomplete_repeated_group_is_dropped() {
        // The trailing lone `7` cannot form a pair.
        assert_eq!(run("M0,0 L1,1 7"), vec![pts(&[(0.0, 0.0), (1.0, 1.0)])]);
    }

    #[test]
    fn unsupported_commands_are_fatal() {
        for data in ["M0,0 A1,1 0 0 1 2,2", "M0,0 Q1,1 2,2", "M0,0 T2,2", "M0,0 X"] {
            let err = run_with(data, Transform::IDENTITY).unwrap_err();
            assert!(matches!(err, ConvertError::UnsupportedPathCommand { offset: 5, .. }), "{data}: {err}");
        }
    }

    #[test]
    fn missing_required_argument_is_fatal() {
        let err = run_with("M0,0 L", Transform::IDENTITY).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedNumber { .. }));
    }

    #[test]
    fn empty_data_draws_nothing() {
        assert!(run("").is_empty());
        assert!(run("   \n\t").is_empty());
    }
}
