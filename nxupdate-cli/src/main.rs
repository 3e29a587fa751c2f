//! nxupdate CLI - Command-line interface
//!
//! Checks for, downloads and extracts the latest patch bundle using the
//! nxupdate library.

mod cli;
mod commands;
mod error;
mod output;
mod runner;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = commands::run(cli) {
        e.exit();
    }
}
