//! svg2pat command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use svgpat::flatten::{DEFAULT_FLATNESS, DEFAULT_MAX_DEPTH};
use svgpat::{Conversion, ConvertOptions, convert};

use super::common::{Verbosity, describe, open_output, read_input};

#[derive(Parser, Debug)]
#[command(
    name = "svg2pat",
    version,
    about = "Convert an SVG drawing into a pattern (.pat) program"
)]
pub struct Svg2PatArgs {
    /// Input SVG file ("-" or omitted for stdin).
    pub input: Option<PathBuf>,

    /// Output pattern file ("-" or omitted for stdout).
    pub output: Option<PathBuf>,

    /// Clip geometry to the page rectangle (default).
    #[arg(long, overrides_with = "no_clip")]
    pub clip: bool,

    /// Keep geometry that falls outside the page.
    #[arg(long, overrides_with = "clip")]
    pub no_clip: bool,

    /// Curve flatness threshold, in inches.
    #[arg(long, default_value_t = DEFAULT_FLATNESS, value_parser = positive_f64)]
    pub flatness: f64,

    /// Maximum curve subdivision depth.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: u32,

    /// Write conversion statistics as JSON to FILE.
    #[arg(long, value_name = "FILE")]
    pub stats: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

impl Svg2PatArgs {
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            clip: !self.no_clip,
            flatness: self.flatness,
            max_subdivision_depth: self.max_depth,
            ..ConvertOptions::default()
        }
    }
}

fn positive_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a positive number, got {s}"))
    }
}

/// Page size in JSON output format.
#[derive(Serialize)]
struct JsonPage {
    width: f64,
    height: f64,
}

/// Conversion statistics for JSON output.
#[derive(Serialize)]
struct JsonStats {
    page: JsonPage,
    clip: bool,
    parsed_polylines: usize,
    parsed_points: usize,
    clipped_polylines: usize,
    clipped_points: usize,
    emitted_polylines: usize,
    emitted_points: usize,
    records: usize,
}

impl JsonStats {
    fn new(conversion: &Conversion, options: &ConvertOptions) -> Self {
        let stats = conversion.stats;
        Self {
            page: JsonPage {
                width: conversion.page.width,
                height: conversion.page.height,
            },
            clip: options.clip,
            parsed_polylines: stats.parsed_polylines,
            parsed_points: stats.parsed_points,
            clipped_polylines: stats.clipped_polylines,
            clipped_points: stats.clipped_points,
            emitted_polylines: stats.emitted_polylines,
            emitted_points: stats.emitted_points,
            records: conversion.records.len(),
        }
    }
}

fn write_stats(path: &Path, conversion: &Conversion, options: &ConvertOptions) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&JsonStats::new(conversion, options))
        .context("serialize stats")?;
    fs::write(path, json).with_context(|| format!("write stats '{}'", path.display()))
}

/// Execute the svg2pat command.
pub fn run(args: Svg2PatArgs) -> anyhow::Result<()> {
    let svg = read_input(args.input.as_deref())?;
    let options = args.options();

    let conversion = convert(&svg, &options)
        .with_context(|| format!("convert {}", describe(args.input.as_deref())))?;
    info!(
        "page is {}in x {}in, {} records",
        conversion.page.width,
        conversion.page.height,
        conversion.records.len()
    );

    let mut out = open_output(args.output.as_deref())?;
    conversion
        .write_to(&mut out)
        .with_context(|| format!("write pattern to {}", describe(args.output.as_deref())))?;

    if let Some(path) = &args.stats {
        write_stats(path, &conversion, &options)?;
    }

    Ok(())
}
