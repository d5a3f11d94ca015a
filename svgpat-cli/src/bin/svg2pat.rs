use clap::Parser;

use svgpat_cli::cli::{Svg2PatArgs, init_logging, svg2pat};

fn main() -> anyhow::Result<()> {
    let args = Svg2PatArgs::parse();
    init_logging(args.verbosity);
    svg2pat::run(args)
}
