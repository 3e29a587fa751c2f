//! Progress and per-attempt reporting for downloads.

use std::io::{self, Write};

/// Callback receiving the running byte count of the current attempt.
///
/// The count restarts from zero when an attempt is retried.
pub type ByteProgressCallback = Box<dyn Fn(u64) + Send + Sync>;

/// Callback invoked once per download attempt.
///
/// This is the point where a presentation layer can refresh its display
/// between attempts.
pub type AttemptCallback = Box<dyn Fn(&AttemptReport) + Send + Sync>;

/// What happened on one download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// The transfer completed.
    Succeeded { bytes: u64 },
    /// The transfer failed transiently and will be retried.
    Retrying { reason: String },
    /// The transfer failed and no further attempt will be made.
    Failed { reason: String },
}

/// Report passed to [`AttemptCallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Attempt budget of the session.
    pub max_attempts: u32,
    /// Outcome of the attempt.
    pub status: AttemptStatus,
}

impl AttemptReport {
    /// Whether this is the last report of the session.
    pub fn is_final(&self) -> bool {
        !matches!(self.status, AttemptStatus::Retrying { .. })
    }
}

/// Writer adapter that reports bytes written through a callback.
pub(crate) struct ProgressWriter<'a, W> {
    inner: W,
    written: u64,
    callback: Option<&'a ByteProgressCallback>,
}

impl<'a, W: Write> ProgressWriter<'a, W> {
    pub(crate) fn new(inner: W, callback: Option<&'a ByteProgressCallback>) -> Self {
        Self {
            inner,
            written: 0,
            callback,
        }
    }
}

impl<W: Write> Write for ProgressWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        if let Some(cb) = self.callback {
            cb(self.written);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
