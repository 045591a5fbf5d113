//! kbdocs CLI. Builds the per-language documentation corpus.
//!
//! Turns raw downloaded documentation (text archives, the ECMA-262 text,
//! the Swift book markdown, the C++ working draft PDF) into the
//! `languages/<lang>/docs/` layout consumed by the retrieval pipeline.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
