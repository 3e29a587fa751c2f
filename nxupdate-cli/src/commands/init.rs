//! Init command - write a default configuration file.

use nxupdate::config::ConfigFile;

use crate::cli::GlobalArgs;
use crate::error::CliError;
use crate::output;
use crate::runner::resolve_config_path;

/// Run the init command.
pub fn run(global: &GlobalArgs, force: bool) -> Result<(), CliError> {
    let path = resolve_config_path(global);

    if path.exists() && !force {
        output::warning(&format!(
            "Configuration file already exists: {}",
            path.display()
        ));
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    ConfigFile::default().save_to(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Edit this file to customize nxupdate settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
