//! Retry policy and per-download session state.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default maximum number of attempts per download.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default fixed delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Same attempt budget without waiting between attempts.
    pub fn without_delay(mut self) -> Self {
        self.delay = Duration::ZERO;
        self
    }
}

/// Terminal result of a transfer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionResult {
    /// The transfer completed with a success status.
    Completed { bytes: u64 },
    /// The transfer failed; the destination may be partial.
    Failed,
}

/// State of one download invocation.
///
/// Created when a download starts and discarded once its result has been
/// returned to the caller.
#[derive(Debug, Clone)]
pub struct TransferSession {
    url: String,
    destination: PathBuf,
    policy: RetryPolicy,
    attempts: u32,
    result: Option<SessionResult>,
}

impl TransferSession {
    /// Start a session for `url` written to `destination`.
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>, policy: RetryPolicy) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            policy,
            attempts: 0,
            result: None,
        }
    }

    /// URL being fetched.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Register a new attempt and return its 1-based number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Whether another attempt is allowed after the current one.
    pub fn can_retry(&self) -> bool {
        self.result.is_none() && self.attempts < self.policy.max_attempts
    }

    /// Mark the session as successfully completed.
    pub fn complete(&mut self, bytes: u64) {
        self.result = Some(SessionResult::Completed { bytes });
    }

    /// Mark the session as failed.
    pub fn fail(&mut self) {
        self.result = Some(SessionResult::Failed);
    }
}
