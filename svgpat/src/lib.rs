//! # svgpat
//!
//! Convert SVG line art into pattern (`.pat`) programs for a plotter-style
//! motion controller, and back again for previewing.
//!
//! The forward pipeline is: walk the document → interpret path data →
//! flatten curves → clip to the page → quantize and emit records.
//!
//! ## Rust Lesson #7: Modules
//!
//! Every stage lives in its own module and only talks to its neighbours
//! through plain data (`Transform`, `Polyline`, `PatternRecord`):
//! - `pub mod foo;` = load `foo.rs` and export it
//! - `pub use foo::Bar;` = re-export Bar at the crate root

pub mod accumulator;
pub mod clip;
pub mod convert;
pub mod emit;
pub mod error;
pub mod flatten;
pub mod geometry;
pub mod inverse;
pub mod page;
pub mod path;
pub mod shapes;
pub mod transform;
pub mod units;
pub mod walker;

// Re-export common types at crate root for convenience.
pub use convert::{Conversion, ConversionStats, ConvertOptions, convert};
pub use emit::{PatternRecord, write_pattern};
pub use error::{ConvertError, Result};
pub use geometry::{Point, Polyline};
pub use inverse::{ParsedPattern, PatternIssue, PatternStep, parse_pattern, pattern_to_svg};
pub use page::Page;
pub use transform::Transform;
