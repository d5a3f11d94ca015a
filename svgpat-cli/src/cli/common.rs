//! Common utilities shared across CLI commands.

use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::Context as _;
use clap::Args;
use tracing::Level;

/// `None` or `-` selects the standard stream.
fn file_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| *p != Path::new("-"))
}

/// Human-readable name of an input or output, for error context.
pub fn describe(path: Option<&Path>) -> String {
    match file_path(path) {
        Some(p) => format!("'{}'", p.display()),
        None => "standard stream".to_string(),
    }
}

/// Read the whole input as UTF-8 text.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match file_path(path) {
        Some(p) => fs::read_to_string(p).with_context(|| format!("read '{}'", p.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("read standard input")?;
            Ok(text)
        }
    }
}

/// Open the output for buffered writing.
pub fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match file_path(path) {
        Some(p) => {
            let file = File::create(p).with_context(|| format!("create '{}'", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Logging level flags shared by both binaries.
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbosity {
    /// Only report warnings and errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also report parse detail.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Verbosity {
    pub fn level(&self) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

/// Install the stderr log subscriber. Stdout carries only program output.
pub fn init_logging(verbosity: Verbosity) {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(verbosity.level())
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}
