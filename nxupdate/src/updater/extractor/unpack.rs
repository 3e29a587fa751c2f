//! Best-effort streaming extraction.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, error, info, warn};

use super::archive::{ArchiveEntry, ArchiveHandle, EntryKind};
use super::progress::{ExtractionProgress, ExtractionProgressCallback};
use super::summary::{EntryOutcome, ExtractionSummary, SkipReason};
use crate::updater::error::{UpdateError, UpdateResult};

/// Decompression chunk size (8KB).
const CHUNK_SIZE: usize = 8 * 1024;

/// Unpacks a ZIP archive into a destination directory.
///
/// Entries that cannot be written are skipped and recorded in the
/// [`ExtractionSummary`]; only a destination root that cannot be created
/// or an archive that cannot be opened fails the whole extraction.
#[derive(Default)]
pub struct Extractor {
    on_progress: Option<ExtractionProgressCallback>,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked after every processed entry.
    pub fn on_progress(mut self, callback: ExtractionProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Extract `archive` under `destination_root`, reporting only success
    /// or failure.
    ///
    /// Skipped entries do not count as failure.
    pub fn extract(&self, archive: &Path, destination_root: &Path) -> bool {
        match self.try_extract(archive, destination_root) {
            Ok(summary) => {
                if !summary.is_clean() {
                    warn!(
                        skipped = summary.skipped().len(),
                        total = summary.total_entries,
                        "Extraction finished with skipped entries"
                    );
                }
                true
            }
            Err(e) => {
                error!(archive = %archive.display(), error = %e, "Extraction failed");
                false
            }
        }
    }

    /// Extract `archive` under `destination_root`.
    ///
    /// # Errors
    ///
    /// * [`UpdateError::CreateDirFailed`] if the destination root cannot be created
    /// * [`UpdateError::ArchiveOpenFailed`] if the archive is missing or invalid
    pub fn try_extract(
        &self,
        archive: &Path,
        destination_root: &Path,
    ) -> UpdateResult<ExtractionSummary> {
        fs::create_dir_all(destination_root).map_err(|e| UpdateError::CreateDirFailed {
            path: destination_root.to_path_buf(),
            source: e,
        })?;

        let mut handle = ArchiveHandle::open(archive)?;
        let total = handle.count_entries();
        handle.rewind();

        info!(
            archive = %handle.path().display(),
            destination = %destination_root.display(),
            entries = total,
            "Extracting archive"
        );

        let mut progress = ExtractionProgress::new(total);
        let mut summary = ExtractionSummary::new(total);

        if total == 0 {
            self.report(&progress);
            return Ok(summary);
        }

        let mut buffer = vec![0u8; CHUNK_SIZE];

        while let Some(next) = handle.next_entry() {
            let outcome = match next {
                Ok(mut entry) => unpack_entry(&mut entry, destination_root, &mut buffer),
                Err(unreadable) => EntryOutcome::Skipped {
                    name: unreadable.name,
                    reason: SkipReason::Unreadable(unreadable.reason),
                },
            };

            match &outcome {
                EntryOutcome::Skipped { name, reason } => {
                    warn!(entry = %name, reason = %reason, "Skipping archive entry");
                }
                EntryOutcome::File { path, bytes } => {
                    debug!(path = %path.display(), bytes, "Extracted file");
                }
                EntryOutcome::Directory { path } => {
                    debug!(path = %path.display(), "Created directory");
                }
            }

            summary.record(outcome);
            progress.advance();
            self.report(&progress);
        }

        info!(
            files = summary.files_written(),
            directories = summary.directories_created(),
            skipped = summary.skipped().len(),
            "Extraction complete"
        );

        Ok(summary)
    }

    fn report(&self, progress: &ExtractionProgress) {
        if let Some(callback) = &self.on_progress {
            callback(progress);
        }
    }
}

/// Write one entry below `root`.
fn unpack_entry<R: Read>(
    entry: &mut ArchiveEntry<R>,
    root: &Path,
    buffer: &mut [u8],
) -> EntryOutcome {
    let name = entry.name().to_string();
    let skip = |reason| EntryOutcome::Skipped {
        name: name.clone(),
        reason,
    };

    let Some(relative) = entry.relative_path() else {
        return skip(SkipReason::UnsafePath);
    };
    let target = root.join(relative);

    if entry.kind() == EntryKind::Directory {
        return match fs::create_dir_all(&target) {
            Ok(()) => EntryOutcome::Directory { path: target },
            Err(e) => skip(SkipReason::CreateDirFailed {
                path: target,
                message: e.to_string(),
            }),
        };
    }

    if let Some(parent) = target.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            return skip(SkipReason::CreateDirFailed {
                path: parent.to_path_buf(),
                message: e.to_string(),
            });
        }
    }

    let file = match File::create(&target) {
        Ok(file) => file,
        Err(e) => {
            return skip(SkipReason::OpenFailed {
                path: target,
                message: e.to_string(),
            })
        }
    };
    let mut writer = BufWriter::new(file);
    let mut written = 0u64;

    loop {
        let read = match entry.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return skip(SkipReason::ReadFailed(e.to_string())),
        };
        if let Err(e) = writer.write_all(&buffer[..read]) {
            return skip(SkipReason::WriteFailed {
                path: target,
                message: e.to_string(),
            });
        }
        written += read as u64;
    }

    if let Err(e) = writer.flush() {
        return skip(SkipReason::WriteFailed {
            path: target,
            message: e.to_string(),
        });
    }

    EntryOutcome::File {
        path: target,
        bytes: written,
    }
}
