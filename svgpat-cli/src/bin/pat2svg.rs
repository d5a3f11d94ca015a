use clap::Parser;

use svgpat_cli::cli::{Pat2SvgArgs, init_logging, pat2svg};

fn main() -> anyhow::Result<()> {
    let args = Pat2SvgArgs::parse();
    init_logging(args.verbosity);
    pat2svg::run(args)
}
