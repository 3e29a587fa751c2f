//! Archive download with bounded retry.
//!
//! This module provides:
//! - The retry loop around a [`Transport`](crate::transport::Transport) (`fetcher`)
//! - Retry policy and per-invocation session state (`session`)
//! - Per-attempt and byte-level progress hooks (`progress`)
//! - SHA-256 digests of the downloaded archive (`checksum`)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use nxupdate::transport::{HttpSettings, ReqwestTransport};
//! use nxupdate::updater::download::Fetcher;
//!
//! let transport = ReqwestTransport::new(HttpSettings::default())?;
//! let fetcher = Fetcher::new(transport).on_attempt(Box::new(|report| {
//!     println!("attempt {}/{}: {:?}", report.attempt, report.max_attempts, report.status);
//! }));
//!
//! if fetcher.download("https://example.com/all_patches.zip", Path::new("all_patches.zip")) {
//!     println!("Download successful!");
//! }
//! ```

mod checksum;
mod fetcher;
mod progress;
mod session;

pub use checksum::{sha256_file, verify_sha256};
pub use fetcher::{DownloadReport, Fetcher};
pub use progress::{AttemptCallback, AttemptReport, AttemptStatus, ByteProgressCallback};
pub use session::{
    RetryPolicy, SessionResult, TransferSession, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY,
};
