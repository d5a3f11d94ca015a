//! svgpat-cli - command-line front ends for the svgpat library.
//!
//! The binaries in `src/bin/` are thin: they parse arguments, install
//! logging and hand off to the command modules in [`cli`].

pub mod cli;
