//! CLI command implementations.
//!
//! - `svg2pat` - convert an SVG drawing into a pattern program
//! - `pat2svg` - render a pattern program back to SVG for previewing

pub mod common;
pub mod pat2svg;
pub mod svg2pat;

pub use common::{Verbosity, init_logging};
pub use pat2svg::Pat2SvgArgs;
pub use svg2pat::Svg2PatArgs;
