//! INI configuration file.
//!
//! Settings live in `config.ini` under the platform configuration
//! directory (`~/.config/nxupdate/config.ini` on Linux). A missing file
//! yields the defaults; unknown sections and keys are ignored.

mod keys;

pub use keys::ConfigKey;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use crate::transport::{default_user_agent, HttpSettings};
use crate::updater::connectivity::DEFAULT_PROBE_URL;
use crate::updater::download::{RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};

/// GitHub API endpoint describing the latest patch release.
pub const DEFAULT_RELEASE_API_URL: &str =
    "https://api.github.com/repos/YoshiCrystal9/FortPatcher-NX/releases/latest";

/// Download URL of the latest patch bundle.
pub const DEFAULT_ARCHIVE_URL: &str =
    "https://github.com/YoshiCrystal9/FortPatcher-NX/releases/latest/download/all_patches.zip";

/// File name of the downloaded bundle.
pub const DEFAULT_ARCHIVE_NAME: &str = "all_patches.zip";

const CONFIG_DIR_NAME: &str = "nxupdate";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write config file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `[release]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSettings {
    pub api_url: String,
    pub archive_url: String,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_RELEASE_API_URL.to_string(),
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
        }
    }
}

/// `[network]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    /// Endpoint that must answer 200 before downloading.
    pub probe_url: String,
    /// Request timeout; zero disables it.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub max_attempts: u32,
    /// Pause between transient failures.
    pub retry_delay: Duration,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        let http = HttpSettings::default();
        Self {
            probe_url: DEFAULT_PROBE_URL.to_string(),
            timeout: http.timeout.unwrap_or(Duration::ZERO),
            connect_timeout: http.connect_timeout,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            user_agent: default_user_agent(),
            accept_invalid_certs: http.accept_invalid_certs,
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    /// Directory the bundle is extracted into.
    pub root: PathBuf,
    /// Where the bundle is downloaded; relative paths resolve against `root`.
    pub archive: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            archive: PathBuf::from(DEFAULT_ARCHIVE_NAME),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive, e.g. `info` or `nxupdate=debug`.
    pub level: String,
    /// Optional log file in addition to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Parsed `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub release: ReleaseSettings,
    pub network: NetworkSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from [`config_file_path`], falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let ini = Ini::load_from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_ini(&ini)
    }

    /// Build from an already parsed document.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|props| props.get(key.key_name()));

            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        Ok(config)
    }

    /// Render every setting, defaults included.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Save to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating its parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        self.to_ini().write_to_file(path).map_err(write_err)
    }

    /// Absolute or root-relative download location of the bundle.
    pub fn archive_path(&self) -> PathBuf {
        if self.storage.archive.is_absolute() {
            self.storage.archive.clone()
        } else {
            self.storage.root.join(&self.storage.archive)
        }
    }

    /// Transport settings for the `[network]` section.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings::default()
            .with_timeout((!self.network.timeout.is_zero()).then_some(self.network.timeout))
            .with_connect_timeout(self.network.connect_timeout)
            .with_user_agent(self.network.user_agent.clone())
            .with_accept_invalid_certs(self.network.accept_invalid_certs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.network.max_attempts, self.network.retry_delay)
    }
}

/// Directory holding `config.ini`.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default location of `config.ini`.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.network.max_attempts, 5);
        assert_eq!(config.network.retry_delay, Duration::from_secs(3));
        assert_eq!(config.network.probe_url, "https://example.com");
        assert!(config.network.accept_invalid_certs);
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(
            &path,
            "[network]\nmax_attempts = 2\nunknown = 1\n\n[storage]\nroot = /sdcard\n\n[extra]\nfoo = bar\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.network.max_attempts, 2);
        assert_eq!(config.network.retry_delay, DEFAULT_RETRY_DELAY);
        assert_eq!(config.storage.root, PathBuf::from("/sdcard"));
        assert_eq!(config.archive_path(), PathBuf::from("/sdcard/all_patches.zip"));
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[network]\ntimeout = soon\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "network.timeout"));
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.storage.root = PathBuf::from("/switch");
        config.storage.archive = PathBuf::from("/tmp/bundle.zip");
        config.logging.file = Some(PathBuf::from("/tmp/nxupdate.log"));
        config.network.accept_invalid_certs = false;
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.archive_path(), PathBuf::from("/tmp/bundle.zip"));
    }

    #[test]
    fn test_http_settings_and_retry_policy() {
        let mut config = ConfigFile::default();
        config.network.timeout = Duration::from_secs(60);
        config.network.max_attempts = 0;
        config.network.user_agent = "custom/1.0".to_string();

        let http = config.http_settings();
        assert_eq!(http.timeout, Some(Duration::from_secs(60)));
        assert_eq!(http.user_agent, "custom/1.0");
        assert_eq!(config.retry_policy().max_attempts, 1);
    }

    #[test]
    fn test_zero_timeout_disables_request_timeout() {
        let config = ConfigFile::default();
        assert_eq!(config.network.timeout, Duration::ZERO);
        assert_eq!(config.http_settings().timeout, None);

        let ini = config.to_ini();
        assert_eq!(ini.get_from(Some("network"), "timeout"), Some("0"));
    }

    #[test]
    fn test_config_file_path_name() {
        let path = config_file_path();
        assert!(path.ends_with("nxupdate/config.ini"));
    }
}
