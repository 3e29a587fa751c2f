//! Check command - connectivity and latest release.

use nxupdate::release::ReleaseClient;
use nxupdate::updater::ConnectivityProbe;

use crate::cli::GlobalArgs;
use crate::error::CliError;
use crate::output;
use crate::runner::CliRunner;

/// Run the check command.
pub fn run(global: &GlobalArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(global)?;
    runner.log_startup("check");
    let config = runner.config();
    let transport = runner.transport()?;

    output::status("Checking internet connection...");
    ConnectivityProbe::with_url(&transport, config.network.probe_url.clone()).check()?;
    output::success("Internet connection available");

    let release = ReleaseClient::new(&transport).latest(&config.release.api_url)?;
    output::print_release(&release);

    Ok(())
}
