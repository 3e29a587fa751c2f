//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use clap::Subcommand;
use nxupdate::config::{ConfigFile, ConfigKey};

use crate::cli::GlobalArgs;
use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., network.max_attempts)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., storage.root)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand; no subcommand lists every setting.
pub fn run(global: &GlobalArgs, command: Option<ConfigCommands>) -> Result<(), CliError> {
    match command.unwrap_or(ConfigCommands::List) {
        ConfigCommands::Get { key } => run_get(global, &key),
        ConfigCommands::Set { key, value } => run_set(global, &key, &value),
        ConfigCommands::List => run_list(global),
        ConfigCommands::Path => {
            println!("{}", resolve_config_path(global).display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'nxupdate config list' to see available keys.",
            key
        ))
    })
}

fn run_get(global: &GlobalArgs, key: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = ConfigFile::load_from(&resolve_config_path(global))?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn run_set(global: &GlobalArgs, key: &str, value: &str) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let path = resolve_config_path(global);

    let mut config = ConfigFile::load_from(&path)?;
    config_key.set(&mut config, value)?;
    config.save_to(&path)?;

    println!("Set {} = {}", config_key, value.trim());

    Ok(())
}

fn run_list(global: &GlobalArgs) -> Result<(), CliError> {
    let path = resolve_config_path(global);
    let config = ConfigFile::load_from(&path)?;

    println!("Configuration Settings ({})", path.display());
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    Ok(())
}
