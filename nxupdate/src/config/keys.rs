//! Addressable configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::{ConfigError, ConfigFile};

/// A single setting in `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ReleaseApiUrl,
    ReleaseArchiveUrl,
    NetworkProbeUrl,
    NetworkTimeout,
    NetworkConnectTimeout,
    NetworkMaxAttempts,
    NetworkRetryDelay,
    NetworkUserAgent,
    NetworkAcceptInvalidCerts,
    StorageRoot,
    StorageArchive,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// Every key, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            Self::ReleaseApiUrl,
            Self::ReleaseArchiveUrl,
            Self::NetworkProbeUrl,
            Self::NetworkTimeout,
            Self::NetworkConnectTimeout,
            Self::NetworkMaxAttempts,
            Self::NetworkRetryDelay,
            Self::NetworkUserAgent,
            Self::NetworkAcceptInvalidCerts,
            Self::StorageRoot,
            Self::StorageArchive,
            Self::LoggingLevel,
            Self::LoggingFile,
        ]
    }

    pub fn section(&self) -> &'static str {
        match self {
            Self::ReleaseApiUrl | Self::ReleaseArchiveUrl => "release",
            Self::NetworkProbeUrl
            | Self::NetworkTimeout
            | Self::NetworkConnectTimeout
            | Self::NetworkMaxAttempts
            | Self::NetworkRetryDelay
            | Self::NetworkUserAgent
            | Self::NetworkAcceptInvalidCerts => "network",
            Self::StorageRoot | Self::StorageArchive => "storage",
            Self::LoggingLevel | Self::LoggingFile => "logging",
        }
    }

    pub fn key_name(&self) -> &'static str {
        match self {
            Self::ReleaseApiUrl => "api_url",
            Self::ReleaseArchiveUrl => "archive_url",
            Self::NetworkProbeUrl => "probe_url",
            Self::NetworkTimeout => "timeout",
            Self::NetworkConnectTimeout => "connect_timeout",
            Self::NetworkMaxAttempts => "max_attempts",
            Self::NetworkRetryDelay => "retry_delay",
            Self::NetworkUserAgent => "user_agent",
            Self::NetworkAcceptInvalidCerts => "accept_invalid_certs",
            Self::StorageRoot => "root",
            Self::StorageArchive => "archive",
            Self::LoggingLevel => "level",
            Self::LoggingFile => "file",
        }
    }

    /// Dotted name, e.g. `network.timeout`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value rendered as it is written to the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::ReleaseApiUrl => config.release.api_url.clone(),
            Self::ReleaseArchiveUrl => config.release.archive_url.clone(),
            Self::NetworkProbeUrl => config.network.probe_url.clone(),
            Self::NetworkTimeout => config.network.timeout.as_secs().to_string(),
            Self::NetworkConnectTimeout => config.network.connect_timeout.as_secs().to_string(),
            Self::NetworkMaxAttempts => config.network.max_attempts.to_string(),
            Self::NetworkRetryDelay => config.network.retry_delay.as_secs().to_string(),
            Self::NetworkUserAgent => config.network.user_agent.clone(),
            Self::NetworkAcceptInvalidCerts => config.network.accept_invalid_certs.to_string(),
            Self::StorageRoot => config.storage.root.display().to_string(),
            Self::StorageArchive => config.storage.archive.display().to_string(),
            Self::LoggingLevel => config.logging.level.clone(),
            Self::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse `value` and store it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if the value does not parse for this key.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            Self::ReleaseApiUrl => config.release.api_url = self.non_empty(value)?,
            Self::ReleaseArchiveUrl => config.release.archive_url = self.non_empty(value)?,
            Self::NetworkProbeUrl => config.network.probe_url = self.non_empty(value)?,
            Self::NetworkTimeout => config.network.timeout = self.seconds(value)?,
            Self::NetworkConnectTimeout => config.network.connect_timeout = self.seconds(value)?,
            Self::NetworkMaxAttempts => {
                let attempts: u32 = self.parse(value)?;
                if attempts == 0 {
                    return Err(self.invalid(value, "must be at least 1"));
                }
                config.network.max_attempts = attempts;
            }
            Self::NetworkRetryDelay => config.network.retry_delay = self.seconds(value)?,
            Self::NetworkUserAgent => config.network.user_agent = self.non_empty(value)?,
            Self::NetworkAcceptInvalidCerts => {
                config.network.accept_invalid_certs = self.boolean(value)?
            }
            Self::StorageRoot => config.storage.root = PathBuf::from(self.non_empty(value)?),
            Self::StorageArchive => config.storage.archive = PathBuf::from(self.non_empty(value)?),
            Self::LoggingLevel => config.logging.level = self.non_empty(value)?,
            Self::LoggingFile => {
                config.logging.file = (!value.is_empty()).then(|| PathBuf::from(value))
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn non_empty(&self, value: &str) -> Result<String, ConfigError> {
        if value.is_empty() {
            return Err(self.invalid(value, "must not be empty"));
        }
        Ok(value.to_string())
    }

    fn parse<T: FromStr>(&self, value: &str) -> Result<T, ConfigError> {
        value
            .parse()
            .map_err(|_| self.invalid(value, "expected a non-negative integer"))
    }

    fn seconds(&self, value: &str) -> Result<Duration, ConfigError> {
        self.parse(value).map(Duration::from_secs)
    }

    fn boolean(&self, value: &str) -> Result<bool, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
