//! Patch bundle updater.
//!
//! This module provides:
//! - Reachability probing before any network work (`connectivity`)
//! - Archive download with bounded retry (`download`)
//! - Best-effort streaming extraction with progress (`extractor`)
//! - The combined probe, download and extract run (`pipeline`)

pub mod connectivity;
pub mod download;
mod error;
pub mod extractor;
mod pipeline;

pub use connectivity::{ConnectivityProbe, DEFAULT_PROBE_URL};
pub use download::{DownloadReport, Fetcher, RetryPolicy};
pub use error::{UpdateError, UpdateResult};
pub use extractor::{ExtractionProgress, ExtractionSummary, Extractor};
pub use pipeline::{StageCallback, UpdateOutcome, UpdatePipeline, UpdateStage, UpdateTarget};
