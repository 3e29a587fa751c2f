//! Shared command setup: configuration, logging and the HTTP transport.

use std::path::{Path, PathBuf};

use nxupdate::config::{config_file_path, ConfigFile};
use nxupdate::logging::{init_logging, LogOptions, LoggingGuard};
use nxupdate::transport::ReqwestTransport;
use tracing::{debug, info};

use crate::cli::GlobalArgs;
use crate::error::CliError;

/// Context for commands that touch the network or the filesystem.
pub struct CliRunner {
    config: ConfigFile,
    config_path: PathBuf,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load the configuration and install logging.
    pub fn new(global: &GlobalArgs) -> Result<Self, CliError> {
        let config_path = resolve_config_path(global);
        let config = ConfigFile::load_from(&config_path)?;

        let options = LogOptions::new(config.logging.level.clone())
            .with_verbosity(global.verbose, global.quiet)
            .with_file(config.logging.file.clone());
        let logging = init_logging(&options)?;

        Ok(Self {
            config,
            config_path,
            _logging: logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Log the command being run along with the effective settings.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            "nxupdate starting"
        );
        debug!(
            config = %self.config_path.display(),
            root = %self.config.storage.root.display(),
            archive = %self.config.archive_path().display(),
            "Effective configuration"
        );
    }

    /// HTTP transport built from the `[network]` section.
    pub fn transport(&self) -> Result<ReqwestTransport, CliError> {
        Ok(ReqwestTransport::new(self.config.http_settings())?)
    }
}

/// `--config` if given, otherwise the per-user default.
pub fn resolve_config_path(global: &GlobalArgs) -> PathBuf {
    global.config.clone().unwrap_or_else(config_file_path)
}
