//! HTTP transport abstraction.
//!
//! Every network operation in the updater goes through the [`Transport`]
//! trait so the retry and probe logic can be exercised with scripted
//! transports in tests. [`ReqwestTransport`] is the production
//! implementation built on `reqwest::blocking`.
//!
//! Failures are reported as [`TransferError`], which carries the
//! transient/fatal classification used by the fetcher's retry loop.

mod http;

pub use http::{default_user_agent, HttpSettings, ReqwestTransport};

use std::io::Write;

use thiserror::Error;

/// Errors produced by a single transfer attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The connection could not be established (refused, unroutable).
    #[error("could not connect: {0}")]
    Connect(String),

    /// The host name did not resolve.
    #[error("could not resolve host: {0}")]
    Resolve(String),

    /// The request did not complete within the configured timeout.
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// The TLS handshake failed.
    #[error("TLS handshake failed: {0}")]
    Tls(String),

    /// The URL or request could not be built.
    #[error("invalid request: {0}")]
    InvalidUrl(String),

    /// The server answered with a non-success status.
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// Any other transport-level failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be written to its destination.
    #[error("failed to write response body: {0}")]
    Write(String),
}

impl TransferError {
    /// Whether a fresh attempt may succeed.
    ///
    /// Only connect failures and timeouts are retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Timeout(_))
    }
}

/// Blocking HTTP operations used by the updater.
pub trait Transport: Send + Sync {
    /// Performs a GET request, streaming the response body into `sink`.
    ///
    /// Redirects are followed. A non-success final status is reported as
    /// [`TransferError::Status`] before any body bytes are written.
    ///
    /// # Returns
    ///
    /// The number of body bytes written to `sink`.
    fn get(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransferError>;

    /// Performs a HEAD request, following redirects.
    ///
    /// # Returns
    ///
    /// The status code of the final response in the redirect chain.
    fn head(&self, url: &str) -> Result<u16, TransferError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransferError> {
        (**self).get(url, sink)
    }

    fn head(&self, url: &str) -> Result<u16, TransferError> {
        (**self).head(url)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn get(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransferError> {
        (**self).get(url, sink)
    }

    fn head(&self, url: &str) -> Result<u16, TransferError> {
        (**self).head(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(TransferError::Connect("refused".into()).is_transient());
        assert!(TransferError::Timeout("30s".into()).is_transient());

        assert!(!TransferError::Resolve("dns error".into()).is_transient());
        assert!(!TransferError::Tls("bad record".into()).is_transient());
        assert!(!TransferError::InvalidUrl("no scheme".into()).is_transient());
        assert!(!TransferError::Status(404).is_transient());
        assert!(!TransferError::Request("reset".into()).is_transient());
        assert!(!TransferError::Write("disk full".into()).is_transient());
    }

    #[test]
    fn test_status_display() {
        let err = TransferError::Status(503);
        assert_eq!(err.to_string(), "server responded with HTTP 503");
    }
}
