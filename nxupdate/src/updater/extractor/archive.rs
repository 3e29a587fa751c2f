//! Read handle over a local ZIP archive.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::updater::error::{UpdateError, UpdateResult};

/// Whether an entry denotes a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// An entry whose local header could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadableEntry {
    pub name: String,
    pub reason: String,
}

/// One named entry of an archive, readable as its decompressed bytes.
pub struct ArchiveEntry<R> {
    name: String,
    kind: EntryKind,
    relative_path: Option<PathBuf>,
    reader: R,
}

impl<R> ArchiveEntry<R> {
    /// Name as stored in the archive, `/`-separated.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Name as a relative path, or `None` if it would escape the
    /// extraction root (absolute paths, `..` components).
    pub fn relative_path(&self) -> Option<&Path> {
        self.relative_path.as_deref()
    }
}

impl<R: Read> Read for ArchiveEntry<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Enumerating handle over a ZIP archive.
///
/// Entries are visited in the archive's central-directory order. The
/// cursor supports a forward pass and [`rewind`](Self::rewind) back to the
/// first entry. The underlying file is closed when the handle is dropped.
pub struct ArchiveHandle {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
    cursor: usize,
}

impl ArchiveHandle {
    /// Open `path` for enumeration.
    ///
    /// # Errors
    ///
    /// [`UpdateError::ArchiveOpenFailed`] if the file is missing, unreadable
    /// or not a valid ZIP archive.
    pub fn open(path: &Path) -> UpdateResult<Self> {
        let open_failed = |reason: String| UpdateError::ArchiveOpenFailed {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| open_failed(e.to_string()))?;
        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| open_failed(e.to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            cursor: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Walk the remaining entries without decompressing them.
    ///
    /// Leaves the cursor at the end; call [`rewind`](Self::rewind) before
    /// reading entries.
    pub fn count_entries(&mut self) -> usize {
        let mut count = 0;
        while self.advance().is_some() {
            count += 1;
        }
        count
    }

    /// Move the cursor back to the first entry.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Open the entry under the cursor and advance.
    ///
    /// Returns `None` once every entry has been visited.
    pub fn next_entry(
        &mut self,
    ) -> Option<Result<ArchiveEntry<impl Read + '_>, UnreadableEntry>> {
        let index = self.advance()?;
        let fallback_name = self
            .archive
            .name_for_index(index)
            .unwrap_or_default()
            .to_string();

        let entry = match self.archive.by_index(index) {
            Ok(file) => file,
            Err(e) => {
                return Some(Err(UnreadableEntry {
                    name: fallback_name,
                    reason: e.to_string(),
                }))
            }
        };

        let name = entry.name().to_string();
        let kind = if entry.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        let relative_path = entry.enclosed_name();

        Some(Ok(ArchiveEntry {
            name,
            kind,
            relative_path,
            reader: entry,
        }))
    }

    fn advance(&mut self) -> Option<usize> {
        if self.cursor >= self.archive.len() {
            return None;
        }
        let index = self.cursor;
        self.cursor += 1;
        Some(index)
    }
}
