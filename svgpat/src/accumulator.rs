//! Polyline accumulation.
//!
//! Receives already-transformed points from the path interpreter and the
//! curve flattener. A moveto finalizes whatever polyline is open and
//! starts the next one.

use crate::geometry::{Point, Polyline};

#[derive(Debug, Default)]
pub struct Accumulator {
    open: Option<Polyline>,
    finished: Vec<Polyline>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalize the open polyline (if any) and start a new one at `p`.
    pub fn move_to(&mut self, p: Point) {
        self.end_polyline();
        self.open = Some(vec![p]);
    }

    /// Extend the open polyline. Starts one at `p` if none is open.
    pub fn line_to(&mut self, p: Point) {
        match self.open.as_mut() {
            Some(polyline) => polyline.push(p),
            None => self.open = Some(vec![p]),
        }
    }

    /// Line back to the open polyline's first point. No-op without one.
    pub fn close_path(&mut self) {
        if let Some(polyline) = self.open.as_mut() {
            if let Some(&first) = polyline.first() {
                polyline.push(first);
            }
        }
    }

    /// Move the open polyline into the finalized list.
    pub fn end_polyline(&mut self) {
        if let Some(polyline) = self.open.take() {
            self.finished.push(polyline);
        }
    }

    /// Finalize everything and hand over the list.
    pub fn finish(mut self) -> Vec<Polyline> {
        self.end_polyline();
        self.finished
    }
}
