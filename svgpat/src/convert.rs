//! The forward pipeline: SVG text in, pattern records out.
//!
//! walk → (clip) → quantize/emit. Each call owns all of its state, so
//! conversions are independent and can run side by side.

use tracing::info;

use crate::clip::{DEFAULT_CLIP_EPSILON, clip_to_page};
use crate::emit::{PatternRecord, emit_program, write_pattern};
use crate::error::Result;
use crate::flatten::{DEFAULT_FLATNESS, DEFAULT_MAX_DEPTH, Flattening};
use crate::geometry::{Polyline, point_count};
use crate::page::Page;
use crate::walker::Walker;

/// Conversion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertOptions {
    /// Trim geometry to the page rectangle.
    pub clip: bool,
    /// Flatness threshold for curve subdivision, in inches.
    pub flatness: f64,
    /// Curve bisection depth cap.
    pub max_subdivision_depth: u32,
    /// Page-edge tolerance used when clipping.
    pub clip_epsilon: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            clip: true,
            flatness: DEFAULT_FLATNESS,
            max_subdivision_depth: DEFAULT_MAX_DEPTH,
            clip_epsilon: DEFAULT_CLIP_EPSILON,
        }
    }
}

impl ConvertOptions {
    pub fn flattening(&self) -> Flattening {
        Flattening {
            flatness: self.flatness,
            max_depth: self.max_subdivision_depth,
        }
    }
}

/// Geometry counts at each stage of a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub parsed_polylines: usize,
    pub parsed_points: usize,
    pub clipped_polylines: usize,
    pub clipped_points: usize,
    pub emitted_polylines: usize,
    pub emitted_points: usize,
}

/// Result of a forward conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub page: Page,
    /// Final polylines in page inches, after clipping when enabled.
    pub polylines: Vec<Polyline>,
    pub records: Vec<PatternRecord>,
    pub stats: ConversionStats,
}

impl Conversion {
    /// Write the pattern program (CRLF-terminated records).
    pub fn write_to<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        write_pattern(&self.records, out)
    }
}

/// Convert an SVG document into a pattern program.
pub fn convert(svg: &str, options: &ConvertOptions) -> Result<Conversion> {
    let walked = Walker::new(options.flattening()).walk(svg)?;
    let page = walked.page;

    let mut stats = ConversionStats {
        parsed_polylines: walked.polylines.len(),
        parsed_points: point_count(&walked.polylines),
        ..ConversionStats::default()
    };

    let polylines = if options.clip {
        clip_to_page(walked.polylines, &page, options.clip_epsilon)
    } else {
        info!("not clipping paths");
        walked.polylines
    };
    stats.clipped_polylines = polylines.len();
    stats.clipped_points = point_count(&polylines);
    info!(
        "have {} paths with {} total points",
        stats.clipped_polylines, stats.clipped_points
    );

    let program = emit_program(&polylines)?;
    stats.emitted_polylines = program.polylines;
    stats.emitted_points = program.points;
    info!(
        "after rounding for output, had {} paths with {} total points",
        stats.emitted_polylines, stats.emitted_points
    );

    Ok(Conversion {
        page,
        polylines,
        records: program.records,
        stats,
    })
}

// ============================================================================
// TESTS
// ============================================================================
