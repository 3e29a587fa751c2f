//! Streaming ZIP extraction with entry-level progress.
//!
//! Extraction is two-pass over a single open archive: the first pass counts
//! entries so progress can be reported as a percentage, the second writes
//! them. Per-entry failures are skipped and collected in an
//! [`ExtractionSummary`].

mod archive;
mod progress;
mod summary;
mod unpack;

pub use archive::{ArchiveEntry, ArchiveHandle, EntryKind, UnreadableEntry};
pub use progress::{ExtractionProgress, ExtractionProgressCallback};
pub use summary::{EntryOutcome, ExtractionSummary, SkipReason};
pub use unpack::Extractor;
