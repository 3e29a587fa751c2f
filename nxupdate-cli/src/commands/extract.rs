//! Extract command - unpack a downloaded bundle.

use std::path::PathBuf;

use crate::cli::GlobalArgs;
use crate::error::CliError;
use crate::output;
use crate::runner::CliRunner;

use super::common::extractor_with_progress;

/// Run the extract command.
pub fn run(
    global: &GlobalArgs,
    archive: Option<PathBuf>,
    dest: Option<PathBuf>,
) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("extract");
    let config = runner.config();

    let archive = archive.unwrap_or_else(|| config.archive_path());
    let dest = dest.unwrap_or_else(|| config.storage.root.clone());

    output::status("Extracting Patches...");
    let (extractor, bar) = extractor_with_progress();
    let result = extractor.try_extract(&archive, &dest);
    bar.finish();

    let summary = result?;
    output::print_extraction(&summary);
    output::success(&format!("Patches extracted to {}", dest.display()));
    Ok(())
}
