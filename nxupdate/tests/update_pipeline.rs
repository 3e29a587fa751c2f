//! Integration tests for the update pipeline.
//!
//! These tests verify the complete update flow including:
//! - Download with transient failures → retry → extraction
//! - Best-effort extraction when individual entries cannot be written
//! - Progress reporting for empty and populated archives
//!
//! Run with: `cargo test --test update_pipeline`

use std::collections::VecDeque;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use nxupdate::transport::{TransferError, Transport};
use nxupdate::updater::download::RetryPolicy;
use nxupdate::updater::extractor::{ExtractionProgress, SkipReason};
use nxupdate::updater::{
    ConnectivityProbe, Extractor, Fetcher, UpdateError, UpdatePipeline, UpdateStage, UpdateTarget,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Build a ZIP archive in memory. Names ending in `/` become directories.
fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}

/// Transport that replays a script of GET outcomes and always answers HEAD with 200.
struct ScriptedServer {
    script: Mutex<VecDeque<Result<Vec<u8>, (Vec<u8>, TransferError)>>>,
    gets: Mutex<u32>,
}

impl ScriptedServer {
    fn new(script: Vec<Result<Vec<u8>, (Vec<u8>, TransferError)>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            gets: Mutex::new(0),
        })
    }

    fn gets(&self) -> u32 {
        *self.gets.lock().unwrap()
    }
}

impl Transport for ScriptedServer {
    fn get(&self, _url: &str, sink: &mut dyn Write) -> Result<u64, TransferError> {
        *self.gets.lock().unwrap() += 1;
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted");

        match step {
            Ok(body) => {
                sink.write_all(&body).unwrap();
                Ok(body.len() as u64)
            }
            Err((partial, err)) => {
                sink.write_all(&partial).unwrap();
                Err(err)
            }
        }
    }

    fn head(&self, _url: &str) -> Result<u16, TransferError> {
        Ok(200)
    }
}

fn connect_refused() -> TransferError {
    TransferError::Connect("connection refused".to_string())
}

fn target(root: &Path) -> UpdateTarget {
    UpdateTarget {
        archive_url: "https://github.com/example/releases/latest/download/all_patches.zip"
            .to_string(),
        archive_path: root.join("all_patches.zip"),
        destination_root: root.to_path_buf(),
    }
}

fn recording_extractor() -> (Extractor, Arc<Mutex<Vec<ExtractionProgress>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let extractor = Extractor::new().on_progress(Box::new(move |progress| {
        sink.lock().unwrap().push(*progress);
    }));
    (extractor, seen)
}

const TREE: &[(&str, &str)] = &[
    ("atmosphere/", ""),
    ("atmosphere/exefs_patches/", ""),
    ("atmosphere/exefs_patches/fortnite/", ""),
    ("atmosphere/exefs_patches/fortnite/0100000000010000.ips", "PATCH\x00\x01EOF"),
    ("atmosphere/contents/0100000000001000/romfs/readme.txt", "nested without dir entries"),
    ("VERSION", "1.4.2\n"),
];

fn tree_zip() -> Vec<u8> {
    let entries: Vec<(&str, &[u8])> = TREE
        .iter()
        .map(|(name, contents)| (*name, contents.as_bytes()))
        .collect();
    build_zip(&entries)
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Transient failures with partial bodies are overwritten by the final attempt,
/// and the extracted tree matches the archive byte for byte.
#[test]
fn test_retry_then_round_trip_extraction() {
    let temp = TempDir::new().unwrap();
    let archive = tree_zip();
    let server = ScriptedServer::new(vec![
        Err((archive[..10].to_vec(), TransferError::Timeout("stalled".to_string()))),
        Err((Vec::new(), connect_refused())),
        Err((archive[..archive.len() / 2].to_vec(), connect_refused())),
        Err((Vec::new(), connect_refused())),
        Ok(archive.clone()),
    ]);

    let stages = Arc::new(Mutex::new(Vec::new()));
    let stage_sink = Arc::clone(&stages);
    let (extractor, progress) = recording_extractor();

    let pipeline = UpdatePipeline::new(
        Fetcher::new(Arc::clone(&server)).with_retry_policy(RetryPolicy::default().without_delay()),
        extractor,
    )
    .with_probe(ConnectivityProbe::new(Arc::clone(&server)))
    .on_stage(Box::new(move |stage| stage_sink.lock().unwrap().push(stage)));

    let outcome = pipeline.run(&target(temp.path())).unwrap();

    assert_eq!(server.gets(), 5);
    assert_eq!(outcome.download.attempts, 5);
    assert_eq!(std::fs::read(temp.path().join("all_patches.zip")).unwrap(), archive);

    for (name, contents) in TREE {
        let path = temp.path().join(name.trim_end_matches('/'));
        if name.ends_with('/') {
            assert!(path.is_dir(), "missing directory {}", name);
        } else {
            assert_eq!(std::fs::read(&path).unwrap(), contents.as_bytes(), "mismatch in {}", name);
        }
    }

    assert_eq!(outcome.extraction.files_written(), 3);
    assert_eq!(outcome.extraction.directories_created(), 3);
    assert!(outcome.extraction.is_clean());
    assert_eq!(progress.lock().unwrap().last().unwrap().percent(), 100);
    assert_eq!(stages.lock().unwrap().last(), Some(&UpdateStage::Complete));
}

/// Five transient failures exhaust the budget and extraction never starts.
#[test]
fn test_retries_exhausted_stops_pipeline() {
    let temp = TempDir::new().unwrap();
    let server = ScriptedServer::new((0..5).map(|_| Err((Vec::new(), connect_refused()))).collect());
    let (extractor, progress) = recording_extractor();

    let pipeline = UpdatePipeline::new(
        Fetcher::new(Arc::clone(&server)).with_retry_policy(RetryPolicy::default().without_delay()),
        extractor,
    );

    let err = pipeline.run(&target(temp.path())).unwrap_err();

    assert!(matches!(err, UpdateError::RetriesExhausted { attempts: 5, .. }));
    assert_eq!(server.gets(), 5);
    assert!(progress.lock().unwrap().is_empty());
}

/// An entry whose destination is occupied by a directory is skipped; every
/// other file is written and progress still reaches 100%.
#[test]
fn test_unwritable_entry_is_skipped() {
    let temp = TempDir::new().unwrap();
    let archive_path = temp.path().join("bundle.zip");
    let entries: Vec<(String, Vec<u8>)> = (0..6)
        .map(|i| (format!("patches/{}.ips", i), format!("patch {}", i).into_bytes()))
        .collect();
    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(name, body)| (name.as_str(), body.as_slice()))
        .collect();
    std::fs::write(&archive_path, build_zip(&borrowed)).unwrap();

    let root = temp.path().join("sd");
    std::fs::create_dir_all(root.join("patches/3.ips")).unwrap();

    let (extractor, progress) = recording_extractor();
    let summary = extractor.try_extract(&archive_path, &root).unwrap();

    assert_eq!(summary.total_entries, 6);
    assert_eq!(summary.files_written(), 5);
    let skipped = summary.skipped();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].0, "patches/3.ips");
    assert!(matches!(skipped[0].1, SkipReason::OpenFailed { .. }));

    for i in [0, 1, 2, 4, 5] {
        assert_eq!(
            std::fs::read(root.join(format!("patches/{}.ips", i))).unwrap(),
            format!("patch {}", i).into_bytes()
        );
    }

    let progress = progress.lock().unwrap();
    assert_eq!(progress.len(), 6);
    assert_eq!(progress.last().unwrap().processed(), 6);
    assert_eq!(progress.last().unwrap().percent(), 100);
}

/// An empty archive extracts successfully and reports completion at once.
#[test]
fn test_empty_archive() {
    let temp = TempDir::new().unwrap();
    let archive_path = temp.path().join("empty.zip");
    std::fs::write(&archive_path, build_zip(&[])).unwrap();

    let (extractor, progress) = recording_extractor();
    assert!(extractor.extract(&archive_path, &temp.path().join("out")));

    let progress = progress.lock().unwrap();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].percent(), 100);
    assert!(temp.path().join("out").is_dir());
}

/// Processed counts strictly increase on every entry, skips included, and
/// percentages never decrease.
#[test]
fn test_progress_is_monotonic() {
    let temp = TempDir::new().unwrap();
    let archive_path = temp.path().join("many.zip");
    let names: Vec<String> = (0..250).map(|i| format!("d{}/f{}.bin", i % 7, i)).collect();
    let mut entries: Vec<(&str, &[u8])> = names.iter().map(|n| (n.as_str(), &b"x"[..])).collect();
    entries.insert(100, ("../escape.bin", &b"evil"[..]));
    std::fs::write(&archive_path, build_zip(&entries)).unwrap();

    let (extractor, progress) = recording_extractor();
    let summary = extractor.try_extract(&archive_path, &temp.path().join("out")).unwrap();

    assert_eq!(summary.skipped().len(), 1);
    assert!(!temp.path().join("escape.bin").exists());

    let progress = progress.lock().unwrap();
    assert_eq!(progress.len(), 251);
    for pair in progress.windows(2) {
        assert!(pair[1].processed() > pair[0].processed());
        assert!(pair[1].percent() >= pair[0].percent());
    }
    assert_eq!(progress.last().unwrap().percent(), 100);
}

/// A fatal status aborts after a single request.
#[test]
fn test_fatal_status_is_not_retried() {
    let temp = TempDir::new().unwrap();
    let server = ScriptedServer::new(vec![
        Err((Vec::new(), TransferError::Status(404))),
        Ok(tree_zip()),
    ]);

    let fetcher = Fetcher::new(Arc::clone(&server))
        .with_retry_policy(RetryPolicy::default().without_delay());

    assert!(!fetcher.download("https://example.com/missing.zip", &temp.path().join("a.zip")));
    assert_eq!(server.gets(), 1);
}
