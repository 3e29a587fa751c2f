//! Update command - probe, download and extract the latest bundle.

use dialoguer::Confirm;
use nxupdate::config::ConfigFile;
use nxupdate::release::ReleaseClient;
use nxupdate::transport::Transport;
use nxupdate::updater::{ConnectivityProbe, UpdatePipeline, UpdateStage, UpdateTarget};
use tracing::warn;

use super::common::{extractor_with_progress, fetcher_with_progress};
use crate::cli::GlobalArgs;
use crate::error::CliError;
use crate::output;
use crate::runner::CliRunner;

/// Run the update command.
pub fn run(global: &GlobalArgs, yes: bool, skip_check: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("update");
    let config = runner.config();
    let transport = runner.transport()?;

    preflight(&transport, config, skip_check)?;

    let target = UpdateTarget {
        archive_url: config.release.archive_url.clone(),
        archive_path: config.archive_path(),
        destination_root: config.storage.root.clone(),
    };

    if !yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Download and extract patches into {}?",
                target.destination_root.display()
            ))
            .default(true)
            .interact()?;
        if !proceed {
            output::status("Leaving...");
            return Ok(());
        }
    }

    let (fetcher, download_bar) = fetcher_with_progress(&transport, config.retry_policy());
    let (extractor, extract_bar) = extractor_with_progress();
    let stage_download_bar = download_bar.clone();

    // Connectivity was settled before the prompt, so the pipeline runs without a probe.
    let pipeline = UpdatePipeline::new(fetcher, extractor).on_stage(Box::new(move |stage| {
        match stage {
            UpdateStage::Downloading => {
                stage_download_bar.suspend(|| output::warning("Downloading patches..."))
            }
            UpdateStage::Extracting => {
                stage_download_bar.finish_and_clear();
                output::warning("Download successful. Extracting patches...");
            }
            UpdateStage::CheckingConnection | UpdateStage::Complete => {}
        }
    }));

    let result = pipeline.run(&target);
    download_bar.finish_and_clear();
    extract_bar.finish();

    match result {
        Ok(outcome) => {
            output::print_extraction(&outcome.extraction);
            output::success("Update successful!");
            Ok(())
        }
        Err(e) => {
            output::failure("Update failed. Please try again.");
            Err(e.into())
        }
    }
}

/// Check connectivity, then show the latest release.
///
/// No other request is made while offline. Release info is best effort.
fn preflight<T: Transport>(
    transport: &T,
    config: &ConfigFile,
    skip_check: bool,
) -> Result<(), CliError> {
    if !skip_check {
        output::status("Checking internet connection...");
        let probe = ConnectivityProbe::with_url(transport, config.network.probe_url.clone());
        if let Err(e) = probe.check() {
            output::failure("No internet connection. Please connect and try again.");
            return Err(e.into());
        }
        output::success("Internet connection available");
    }

    match ReleaseClient::new(transport).latest(&config.release.api_url) {
        Ok(release) => output::print_release(&release),
        Err(e) => {
            warn!(error = %e, "Could not fetch release info");
            output::failure(&format!("Failed to fetch release info: {}", e));
        }
    }

    Ok(())
}
