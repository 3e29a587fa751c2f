//! Download command - fetch the bundle only.

use std::path::{Path, PathBuf};

use nxupdate::updater::download::{sha256_file, verify_sha256};

use crate::cli::GlobalArgs;
use crate::error::CliError;
use crate::output;
use crate::runner::CliRunner;

use super::common::fetcher_with_progress;

/// Run the download command.
pub fn run(
    global: &GlobalArgs,
    url: Option<String>,
    output_path: Option<PathBuf>,
    sha256: Option<String>,
) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("download");
    let config = runner.config();

    let url = url.unwrap_or_else(|| config.release.archive_url.clone());
    let destination = output_path.unwrap_or_else(|| config.archive_path());

    let transport = runner.transport()?;
    let (fetcher, bar) = fetcher_with_progress(&transport, config.retry_policy());

    bar.suspend(|| output::status("Starting download..."));
    let result = fetcher.try_download(&url, &destination);
    bar.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            output::failure("Download failed. Please try again.");
            return Err(e.into());
        }
    };

    let digest = match archive_digest(&report.destination, sha256.as_deref()) {
        Ok(digest) => digest,
        Err(e) => {
            output::failure("Downloaded archive does not match the expected SHA-256.");
            return Err(e);
        }
    };

    output::success(&format!(
        "Download successful! {} bytes written to {}",
        report.bytes,
        report.destination.display()
    ));
    println!("  SHA-256: {}", digest);
    Ok(())
}

/// Digest of the downloaded archive, checked against `expected` when given.
fn archive_digest(path: &Path, expected: Option<&str>) -> Result<String, CliError> {
    let digest = match expected {
        Some(expected) => verify_sha256(path, expected)?,
        None => sha256_file(path)?,
    };
    Ok(digest)
}
