//! Progress wiring shared across commands.

use indicatif::ProgressBar;
use nxupdate::transport::Transport;
use nxupdate::updater::{Extractor, Fetcher, RetryPolicy};

use crate::output;

/// Fetcher that drives a byte spinner and prints retry status lines.
pub fn fetcher_with_progress<T: Transport>(
    transport: T,
    policy: RetryPolicy,
) -> (Fetcher<T>, ProgressBar) {
    let bar = output::download_bar();
    let bytes_bar = bar.clone();
    let attempt_bar = bar.clone();

    let fetcher = Fetcher::new(transport)
        .with_retry_policy(policy)
        .on_bytes(Box::new(move |bytes| bytes_bar.set_position(bytes)))
        .on_attempt(Box::new(move |report| {
            attempt_bar.suspend(|| output::print_attempt(report));
            if !report.is_final() {
                attempt_bar.set_position(0);
            }
        }));

    (fetcher, bar)
}

/// Extractor that drives an entry bar showing the floored percentage.
pub fn extractor_with_progress() -> (Extractor, ProgressBar) {
    let bar = output::extract_bar();
    let progress_bar = bar.clone();

    let extractor = Extractor::new().on_progress(Box::new(move |progress| {
        progress_bar.set_length(progress.total() as u64);
        progress_bar.set_position(progress.processed() as u64);
        progress_bar.set_message(format!("{}%", progress.percent()));
    }));

    (extractor, bar)
}
