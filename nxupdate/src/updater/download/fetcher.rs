//! Archive download with bounded retry.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, error, info, warn};

use super::progress::{
    AttemptCallback, AttemptReport, AttemptStatus, ByteProgressCallback, ProgressWriter,
};
use super::session::{RetryPolicy, TransferSession};
use crate::transport::{TransferError, Transport};
use crate::updater::error::{UpdateError, UpdateResult};

/// Summary of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// URL the archive was fetched from.
    pub url: String,
    /// Where the archive was written.
    pub destination: PathBuf,
    /// Attempts used, including the successful one.
    pub attempts: u32,
    /// Size of the written body.
    pub bytes: u64,
}

/// Why a single attempt failed.
enum AttemptError {
    /// The transport reported a failure.
    Transfer(TransferError),
    /// The destination could not be opened or flushed.
    Local(UpdateError),
}

/// Downloads a single resource to a local file.
///
/// Each attempt restarts the transfer from the first byte and overwrites
/// the destination. Connect failures and timeouts are retried up to the
/// policy's attempt budget with a fixed delay in between; any other error
/// aborts immediately.
pub struct Fetcher<T> {
    transport: T,
    policy: RetryPolicy,
    on_attempt: Option<AttemptCallback>,
    on_bytes: Option<ByteProgressCallback>,
}

impl<T: Transport> Fetcher<T> {
    /// Create a fetcher with the default retry policy (5 attempts, 3s apart).
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            on_attempt: None,
            on_bytes: None,
        }
    }

    /// Set the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register a callback invoked once per attempt.
    pub fn on_attempt(mut self, callback: AttemptCallback) -> Self {
        self.on_attempt = Some(callback);
        self
    }

    /// Register a callback receiving byte progress of the current attempt.
    pub fn on_bytes(mut self, callback: ByteProgressCallback) -> Self {
        self.on_bytes = Some(callback);
        self
    }

    /// Download `url` to `destination`, reporting only success or failure.
    ///
    /// Failures are logged. On failure the destination may be partially
    /// written or absent.
    pub fn download(&self, url: &str, destination: &Path) -> bool {
        match self.try_download(url, destination) {
            Ok(_) => true,
            Err(e) => {
                error!(url, error = %e, "Download failed");
                false
            }
        }
    }

    /// Download `url` to `destination`.
    ///
    /// # Errors
    ///
    /// * [`UpdateError::DownloadFailed`] for a non-retryable transport error
    /// * [`UpdateError::RetriesExhausted`] when every attempt failed transiently
    /// * [`UpdateError::WriteFailed`] / [`UpdateError::CreateDirFailed`] when
    ///   the destination cannot be prepared
    pub fn try_download(&self, url: &str, destination: &Path) -> UpdateResult<DownloadReport> {
        prepare_destination(destination)?;

        let mut session = TransferSession::new(url, destination, self.policy.clone());
        info!(
            url = session.url(),
            path = %session.destination().display(),
            "Starting download"
        );

        loop {
            let attempt = session.begin_attempt();
            debug!(attempt, max_attempts = session.policy().max_attempts, "Download attempt");

            match self.attempt(url, destination) {
                Ok(bytes) => {
                    session.complete(bytes);
                    self.report(attempt, AttemptStatus::Succeeded { bytes });
                    info!(url, bytes, attempts = attempt, "Download completed successfully");

                    return Ok(DownloadReport {
                        url: url.to_string(),
                        destination: destination.to_path_buf(),
                        attempts: attempt,
                        bytes,
                    });
                }
                Err(AttemptError::Transfer(err)) if err.is_transient() => {
                    if session.can_retry() {
                        warn!(
                            attempt,
                            error = %err,
                            "Download attempt failed with a network error, retrying"
                        );
                        self.report(
                            attempt,
                            AttemptStatus::Retrying {
                                reason: err.to_string(),
                            },
                        );
                        if !self.policy.delay.is_zero() {
                            thread::sleep(self.policy.delay);
                        }
                        continue;
                    }

                    session.fail();
                    self.report(
                        attempt,
                        AttemptStatus::Failed {
                            reason: err.to_string(),
                        },
                    );
                    return Err(UpdateError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: session.attempts(),
                        last: err,
                    });
                }
                Err(AttemptError::Transfer(err)) => {
                    warn!(attempt, error = %err, "Download attempt failed");
                    session.fail();
                    self.report(
                        attempt,
                        AttemptStatus::Failed {
                            reason: err.to_string(),
                        },
                    );
                    return Err(UpdateError::DownloadFailed {
                        url: url.to_string(),
                        source: err,
                    });
                }
                Err(AttemptError::Local(err)) => {
                    session.fail();
                    self.report(
                        attempt,
                        AttemptStatus::Failed {
                            reason: err.to_string(),
                        },
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Run one full transfer into a freshly truncated destination.
    fn attempt(&self, url: &str, destination: &Path) -> Result<u64, AttemptError> {
        let write_failed = |source: io::Error| {
            AttemptError::Local(UpdateError::WriteFailed {
                path: destination.to_path_buf(),
                source,
            })
        };

        let file = File::create(destination).map_err(write_failed)?;
        let mut writer = ProgressWriter::new(BufWriter::new(file), self.on_bytes.as_ref());

        let bytes = self
            .transport
            .get(url, &mut writer)
            .map_err(AttemptError::Transfer)?;

        writer.flush().map_err(write_failed)?;

        Ok(bytes)
    }

    fn report(&self, attempt: u32, status: AttemptStatus) {
        if let Some(ref cb) = self.on_attempt {
            cb(&AttemptReport {
                attempt,
                max_attempts: self.policy.max_attempts,
                status,
            });
        }
    }
}

/// Remove a stale archive and make sure the parent directory exists.
fn prepare_destination(destination: &Path) -> UpdateResult<()> {
    match fs::remove_file(destination) {
        Ok(()) => info!(path = %destination.display(), "Existing archive removed"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %destination.display(), error = %e, "Could not remove existing archive"),
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| UpdateError::CreateDirFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    Ok(())
}
