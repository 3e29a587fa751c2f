//! Error types for the updater.

use std::io;
use std::path::PathBuf;

use crate::transport::TransferError;

/// Result type for updater operations.
pub type UpdateResult<T> = Result<T, UpdateError>;

/// Errors that can occur while checking, downloading or extracting an update.
#[derive(Debug)]
pub enum UpdateError {
    /// The reachability probe failed.
    Unreachable { url: String, reason: String },

    /// A download failed with a non-retryable error.
    DownloadFailed { url: String, source: TransferError },

    /// Every allowed attempt failed with a transient error.
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: TransferError,
    },

    /// Failed to read a file.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// The archive is missing, truncated or not a ZIP file.
    ArchiveOpenFailed { path: PathBuf, reason: String },

    /// Checksum verification failed.
    ChecksumMismatch {
        filename: String,
        expected: String,
        actual: String,
    },

    /// Failed to fetch release metadata.
    ReleaseFetchFailed { url: String, source: TransferError },

    /// Failed to parse release metadata.
    ReleaseParseFailed { url: String, reason: String },
}

impl UpdateError {
    /// Whether this error came from the network rather than local storage.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Unreachable { .. }
                | Self::DownloadFailed { .. }
                | Self::RetriesExhausted { .. }
                | Self::ReleaseFetchFailed { .. }
        )
    }
}

impl std::fmt::Display for UpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable { url, reason } => {
                write!(f, "no internet connection ({} unreachable: {})", url, reason)
            }
            Self::DownloadFailed { url, source } => {
                write!(f, "failed to download {}: {}", url, source)
            }
            Self::RetriesExhausted {
                url,
                attempts,
                last,
            } => {
                write!(
                    f,
                    "failed to download {} after {} attempts: {}",
                    url, attempts, last
                )
            }
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ArchiveOpenFailed { path, reason } => {
                write!(f, "failed to open archive {}: {}", path.display(), reason)
            }
            Self::ChecksumMismatch {
                filename,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "checksum mismatch for {}: expected {}, got {}",
                    filename, expected, actual
                )
            }
            Self::ReleaseFetchFailed { url, source } => {
                write!(f, "failed to fetch release info from {}: {}", url, source)
            }
            Self::ReleaseParseFailed { url, reason } => {
                write!(f, "failed to parse release info from {}: {}", url, reason)
            }
        }
    }
}

impl std::error::Error for UpdateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DownloadFailed { source, .. } => Some(source),
            Self::RetriesExhausted { last, .. } => Some(last),
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            Self::CreateDirFailed { source, .. } => Some(source),
            Self::ReleaseFetchFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
