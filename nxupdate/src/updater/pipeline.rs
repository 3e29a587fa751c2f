//! End-to-end update: probe, download, extract.

use std::fmt;
use std::path::PathBuf;

use tracing::info;

use super::connectivity::ConnectivityProbe;
use super::download::{DownloadReport, Fetcher};
use super::error::UpdateResult;
use super::extractor::{ExtractionSummary, Extractor};
use crate::transport::Transport;

/// Stage the pipeline is entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStage {
    CheckingConnection,
    Downloading,
    Extracting,
    Complete,
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CheckingConnection => "Checking internet connection",
            Self::Downloading => "Downloading",
            Self::Extracting => "Extracting",
            Self::Complete => "Complete",
        };
        f.write_str(label)
    }
}

/// Callback invoked on every stage transition.
pub type StageCallback = Box<dyn Fn(UpdateStage) + Send + Sync>;

/// Where an update comes from and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTarget {
    /// URL of the ZIP archive.
    pub archive_url: String,
    /// Local path the archive is downloaded to.
    pub archive_path: PathBuf,
    /// Directory the archive is extracted into.
    pub destination_root: PathBuf,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub download: DownloadReport,
    pub extraction: ExtractionSummary,
}

/// Runs the update stages in order and stops at the first failure.
pub struct UpdatePipeline<T> {
    probe: Option<ConnectivityProbe<T>>,
    fetcher: Fetcher<T>,
    extractor: Extractor,
    on_stage: Option<StageCallback>,
}

impl<T: Transport> UpdatePipeline<T> {
    pub fn new(fetcher: Fetcher<T>, extractor: Extractor) -> Self {
        Self {
            probe: None,
            fetcher,
            extractor,
            on_stage: None,
        }
    }

    /// Gate the download on a reachability probe.
    pub fn with_probe(mut self, probe: ConnectivityProbe<T>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn on_stage(mut self, callback: StageCallback) -> Self {
        self.on_stage = Some(callback);
        self
    }

    /// Run every configured stage against `target`.
    ///
    /// # Errors
    ///
    /// The first stage error: [`Unreachable`](super::UpdateError::Unreachable)
    /// from the probe, any download error, or an extraction error. A failed
    /// download never reaches extraction.
    pub fn run(&self, target: &UpdateTarget) -> UpdateResult<UpdateOutcome> {
        if let Some(probe) = &self.probe {
            self.enter(UpdateStage::CheckingConnection);
            probe.check()?;
        }

        self.enter(UpdateStage::Downloading);
        let download = self
            .fetcher
            .try_download(&target.archive_url, &target.archive_path)?;

        self.enter(UpdateStage::Extracting);
        let extraction = self
            .extractor
            .try_extract(&target.archive_path, &target.destination_root)?;

        self.enter(UpdateStage::Complete);
        info!(
            url = %target.archive_url,
            files = extraction.files_written(),
            skipped = extraction.skipped().len(),
            "Update successful"
        );

        Ok(UpdateOutcome {
            download,
            extraction,
        })
    }

    fn enter(&self, stage: UpdateStage) {
        info!(stage = %stage, "Update stage");
        if let Some(callback) = &self.on_stage {
            callback(stage);
        }
    }
}
