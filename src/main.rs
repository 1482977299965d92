//! platdiff binary entry point.
//!
//! Parses the command line, initializes logging and runs the selected
//! command on a Tokio runtime. Only the notification step is genuinely
//! async; the comparison itself is synchronous.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use clap::Parser as _;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    platdiff::logging::init()?;

    let cli = cli::Cli::parse();

    tokio::runtime::Runtime::new()?.block_on(cli::run_command(cli.command))?;
    Ok(())
}
