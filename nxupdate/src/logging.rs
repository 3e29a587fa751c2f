//! Tracing subscriber setup.
//!
//! Logs go to stderr and, optionally, to a file through a non-blocking
//! writer. `RUST_LOG` takes precedence over the configured level and the
//! verbosity flags.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::LocalTime};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Errors installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {message}")]
    File { path: PathBuf, message: String },

    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// How logging should be configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Base filter directive when neither flag nor `RUST_LOG` applies.
    pub level: String,
    /// `-v` count: 1 is debug, 2 or more is trace.
    pub verbose: u8,
    /// Only errors.
    pub quiet: bool,
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

impl LogOptions {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_verbosity(mut self, verbose: u8, quiet: bool) -> Self {
        self.verbose = verbose;
        self.quiet = quiet;
        self
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    /// Filter directive implied by the flags and configured level.
    pub fn directive(&self) -> String {
        if self.quiet {
            return "error".to_string();
        }
        match self.verbose {
            0 if self.level.trim().is_empty() => "info".to_string(),
            0 => self.level.trim().to_string(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

/// Keeps the file writer alive; dropping it flushes pending log lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// # Errors
///
/// [`LoggingError::File`] if the log file cannot be opened and
/// [`LoggingError::Install`] if a subscriber is already installed or the
/// directive does not parse.
pub fn init_logging(options: &LogOptions) -> Result<LoggingGuard, LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(options.directive())
            .map_err(|e| LoggingError::Install(e.to_string()))?,
    };

    let (file_layer, guard) = match &options.file {
        Some(path) => {
            let appender = open_log_file(path)?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(LoggingGuard { _file: guard })
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender, LoggingError> {
    let file_error = |message: String| LoggingError::File {
        path: path.to_path_buf(),
        message,
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| file_error("path has no file name".to_string()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|e| file_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directive_from_level() {
        assert_eq!(LogOptions::new("warn").directive(), "warn");
        assert_eq!(LogOptions::new("").directive(), "info");
        assert_eq!(
            LogOptions::new("nxupdate=debug,reqwest=warn").directive(),
            "nxupdate=debug,reqwest=warn"
        );
    }

    #[test]
    fn test_verbosity_overrides_level() {
        assert_eq!(LogOptions::new("warn").with_verbosity(1, false).directive(), "debug");
        assert_eq!(LogOptions::new("warn").with_verbosity(3, false).directive(), "trace");
        assert_eq!(LogOptions::new("trace").with_verbosity(2, true).directive(), "error");
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("nxupdate.log");

        let appender = open_log_file(&path).unwrap();
        drop(appender);

        assert!(path.exists());
    }
}
