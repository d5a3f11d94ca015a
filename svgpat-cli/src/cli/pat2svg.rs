//! pat2svg command implementation.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;

use svgpat::parse_pattern;
use svgpat::inverse::steps_to_svg;

use super::common::{Verbosity, describe, open_output, read_input};

#[derive(Parser, Debug)]
#[command(
    name = "pat2svg",
    version,
    about = "Render a pattern (.pat) program as SVG for previewing"
)]
pub struct Pat2SvgArgs {
    /// Input pattern file ("-" or omitted for stdin).
    pub input: Option<PathBuf>,

    /// Output SVG file ("-" or omitted for stdout).
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

/// Execute the pat2svg command. Unreadable pattern lines are reported and
/// skipped, never fatal.
pub fn run(args: Pat2SvgArgs) -> anyhow::Result<()> {
    let text = read_input(args.input.as_deref())?;

    let parsed = parse_pattern(&text);
    if !parsed.issues.is_empty() {
        info!("skipped {} pattern lines", parsed.issues.len());
    }
    info!("{} moves and lines", parsed.steps.len());

    let svg = steps_to_svg(&parsed.steps);
    let mut out = open_output(args.output.as_deref())?;
    out.write_all(svg.as_bytes())
        .and_then(|()| out.flush())
        .with_context(|| format!("write svg to {}", describe(args.output.as_deref())))
}
