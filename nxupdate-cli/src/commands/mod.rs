//! Command implementations.

mod check;
mod common;
pub mod config;
mod download;
mod extract;
mod init;
mod update;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    match cli.command {
        Commands::Check => check::run(global),
        Commands::Update { yes, skip_check } => update::run(global, yes, skip_check),
        Commands::Download {
            url,
            output,
            sha256,
        } => download::run(global, url, output, sha256),
        Commands::Extract { archive, dest } => extract::run(global, archive, dest),
        Commands::Init { force } => init::run(global, force),
        Commands::Config { command } => config::run(global, command),
    }
}
