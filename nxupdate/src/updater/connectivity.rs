//! Internet reachability probe.

use tracing::{debug, warn};

use crate::transport::Transport;
use crate::updater::error::{UpdateError, UpdateResult};

/// Default endpoint probed before any download.
pub const DEFAULT_PROBE_URL: &str = "https://example.com";

/// Issues a single HEAD request to decide whether the network is usable.
///
/// Reachable means the redirect chain ended in exactly `200 OK`. There is
/// no retry.
pub struct ConnectivityProbe<T> {
    transport: T,
    url: String,
}

impl<T: Transport> ConnectivityProbe<T> {
    /// Probe [`DEFAULT_PROBE_URL`].
    pub fn new(transport: T) -> Self {
        Self::with_url(transport, DEFAULT_PROBE_URL)
    }

    pub fn with_url(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Run the probe.
    ///
    /// # Errors
    ///
    /// [`UpdateError::Unreachable`] on any transport error or a terminal
    /// status other than 200.
    pub fn check(&self) -> UpdateResult<()> {
        let unreachable = |reason: String| UpdateError::Unreachable {
            url: self.url.clone(),
            reason,
        };

        match self.transport.head(&self.url) {
            Ok(200) => {
                debug!(url = %self.url, "Connectivity check passed");
                Ok(())
            }
            Ok(status) => {
                warn!(url = %self.url, status, "Connectivity check failed");
                Err(unreachable(format!("HTTP {}", status)))
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "Connectivity check failed");
                Err(unreachable(e.to_string()))
            }
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.check().is_ok()
    }
}
