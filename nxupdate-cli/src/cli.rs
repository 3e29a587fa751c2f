//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::commands::config::ConfigCommands;

/// Keep the patch bundle up to date.
#[derive(Debug, Parser)]
#[command(name = "nxupdate", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Use this configuration file instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check internet connectivity and show the latest release
    Check,

    /// Download the latest bundle and extract it into the storage root
    Update {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Skip the connectivity check
        #[arg(long)]
        skip_check: bool,
    },

    /// Download the bundle without extracting it
    Download {
        /// Archive URL (defaults to release.archive_url)
        #[arg(long)]
        url: Option<String>,

        /// Destination file (defaults to the configured archive path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Expected SHA-256 of the archive, as hex
        #[arg(long, value_name = "HEX")]
        sha256: Option<String>,
    },

    /// Extract a previously downloaded bundle
    Extract {
        /// Archive to extract (defaults to the configured archive path)
        #[arg(long)]
        archive: Option<PathBuf>,

        /// Destination directory (defaults to storage.root)
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// View or change configuration (lists all settings by default)
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}
