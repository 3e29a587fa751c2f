//! nxupdate - patch bundle updater
//!
//! Downloads the latest patch bundle over HTTPS with bounded retry and
//! unpacks it into a storage root, reporting progress through callbacks.
//!
//! - [`transport`]: blocking HTTP behind a trait, with transient/fatal error classification
//! - [`updater`]: connectivity probe, fetcher, extractor and the combined pipeline
//! - [`release`]: latest-release metadata and its display formatting
//! - [`config`]: the INI configuration file
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod logging;
pub mod release;
pub mod transport;
pub mod updater;

#[cfg(test)]
mod test_support;
