//! Per-entry outcomes of an extraction.

use std::fmt;
use std::path::PathBuf;

/// Why an entry was not extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The name is absolute or climbs out of the destination root.
    UnsafePath,
    /// The entry's header could not be read from the archive.
    Unreadable(String),
    /// A directory on the entry's path could not be created.
    CreateDirFailed { path: PathBuf, message: String },
    /// The destination file could not be opened for writing.
    OpenFailed { path: PathBuf, message: String },
    /// Decompressing the entry failed part way.
    ReadFailed(String),
    /// Writing decompressed bytes failed part way.
    WriteFailed { path: PathBuf, message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsafePath => write!(f, "path escapes the destination directory"),
            Self::Unreadable(message) => write!(f, "unreadable entry: {}", message),
            Self::CreateDirFailed { path, message } => {
                write!(f, "failed to create directory {}: {}", path.display(), message)
            }
            Self::OpenFailed { path, message } => {
                write!(f, "failed to open {} for writing: {}", path.display(), message)
            }
            Self::ReadFailed(message) => write!(f, "failed to read entry: {}", message),
            Self::WriteFailed { path, message } => {
                write!(f, "failed to write {}: {}", path.display(), message)
            }
        }
    }
}

/// Result of processing one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A file was written in full.
    File { path: PathBuf, bytes: u64 },
    /// A directory entry was materialized.
    Directory { path: PathBuf },
    /// The entry was skipped and extraction moved on.
    Skipped { name: String, reason: SkipReason },
}

impl EntryOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Everything that happened during one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Entries found by the counting pass.
    pub total_entries: usize,
    /// One outcome per processed entry, in archive order.
    pub outcomes: Vec<EntryOutcome>,
}

impl ExtractionSummary {
    pub fn new(total_entries: usize) -> Self {
        Self {
            total_entries,
            outcomes: Vec::with_capacity(total_entries),
        }
    }

    pub fn record(&mut self, outcome: EntryOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn files_written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::File { .. }))
            .count()
    }

    pub fn directories_created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::Directory { .. }))
            .count()
    }

    /// Skipped entries as `(name, reason)` pairs.
    pub fn skipped(&self) -> Vec<(&str, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                EntryOutcome::Skipped { name, reason } => Some((name.as_str(), reason)),
                _ => None,
            })
            .collect()
    }

    pub fn bytes_written(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                EntryOutcome::File { bytes, .. } => *bytes,
                _ => 0,
            })
            .sum()
    }

    /// True when no entry was skipped.
    pub fn is_clean(&self) -> bool {
        !self.outcomes.iter().any(EntryOutcome::is_skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractionSummary {
        let mut summary = ExtractionSummary::new(4);
        summary.record(EntryOutcome::Directory {
            path: PathBuf::from("atmosphere"),
        });
        summary.record(EntryOutcome::File {
            path: PathBuf::from("atmosphere/a.ips"),
            bytes: 10,
        });
        summary.record(EntryOutcome::Skipped {
            name: "../evil".to_string(),
            reason: SkipReason::UnsafePath,
        });
        summary.record(EntryOutcome::File {
            path: PathBuf::from("b.ips"),
            bytes: 5,
        });
        summary
    }

    #[test]
    fn test_summary_counts() {
        let summary = sample();
        assert_eq!(summary.files_written(), 2);
        assert_eq!(summary.directories_created(), 1);
        assert_eq!(summary.bytes_written(), 15);
        assert!(!summary.is_clean());

        let skipped = summary.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, "../evil");
        assert_eq!(skipped[0].1, &SkipReason::UnsafePath);
    }

    #[test]
    fn test_empty_summary_is_clean() {
        let summary = ExtractionSummary::new(0);
        assert!(summary.is_clean());
        assert_eq!(summary.bytes_written(), 0);
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::OpenFailed {
            path: PathBuf::from("/patches/a.ips"),
            message: "Is a directory".to_string(),
        };
        assert_eq!(
            reason.to_string(),
            "failed to open /patches/a.ips for writing: Is a directory"
        );
        assert_eq!(
            SkipReason::UnsafePath.to_string(),
            "path escapes the destination directory"
        );
    }
}
