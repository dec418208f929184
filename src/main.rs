//! # Sweeper command-line entry point
//!
//! ```bash
//! sweeper preview sales.csv --rows 10
//! sweeper process a.csv b.xlsx --dedup --fill-missing --to excel -o out/
//! ```
//!
//! Per-file failures are printed as notices; the process only exits with an
//! error when settings or the output directory are unusable.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    sweeper::logging::init(cli.verbose)?;
    cli::run(cli)
}
