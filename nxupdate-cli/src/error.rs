//! CLI error type and exit handling.

use std::fmt;

use console::style;
use nxupdate::config::ConfigError;
use nxupdate::logging::LoggingError;
use nxupdate::transport::TransferError;
use nxupdate::updater::UpdateError;

/// Errors surfaced to the user by a command.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded, parsed or saved.
    Config(String),
    /// Logging could not be initialized.
    Logging(String),
    /// The HTTP client could not be built.
    Transport(String),
    /// A connectivity, download, extraction or release step failed.
    Update(UpdateError),
    /// Interactive prompt failed.
    Prompt(String),
}

impl CliError {
    /// Print the error to stderr and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("{} {}", style("Error:").red().bold(), self);
        std::process::exit(1);
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Logging(msg) => write!(f, "Logging error: {}", msg),
            CliError::Transport(msg) => write!(f, "Failed to create HTTP client: {}", msg),
            CliError::Update(e) => write!(f, "{}", e),
            CliError::Prompt(msg) => write!(f, "Prompt failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Update(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e.to_string())
    }
}

impl From<TransferError> for CliError {
    fn from(e: TransferError) -> Self {
        CliError::Transport(e.to_string())
    }
}

impl From<UpdateError> for CliError {
    fn from(e: UpdateError) -> Self {
        CliError::Update(e)
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Prompt(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_update_error_passes_through() {
        let err: CliError = UpdateError::ArchiveOpenFailed {
            path: PathBuf::from("all_patches.zip"),
            reason: "invalid Zip archive".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "failed to open archive all_patches.zip: invalid Zip archive"
        );
    }

    #[test]
    fn test_config_error_is_prefixed() {
        let err: CliError = ConfigError::UnknownKey("network.bogus".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown configuration key 'network.bogus'"
        );
    }
}
