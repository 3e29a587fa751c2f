//! Console styling and progress bars shared by commands.

use std::time::Duration;

use chrono::Utc;
use console::{style, Emoji};
use indicatif::{ProgressBar, ProgressStyle};
use nxupdate::release::ReleaseInfo;
use nxupdate::updater::download::{AttemptReport, AttemptStatus};
use nxupdate::updater::extractor::ExtractionSummary;

static CHECK: Emoji<'static, 'static> = Emoji("✔ ", "");
static CROSS: Emoji<'static, 'static> = Emoji("✘ ", "");

pub fn success(message: &str) {
    println!("{}{}", style(CHECK).green(), style(message).green());
}

pub fn failure(message: &str) {
    eprintln!("{}{}", style(CROSS).red(), style(message).red());
}

pub fn warning(message: &str) {
    println!("{}", style(message).yellow());
}

pub fn status(message: &str) {
    println!("{}", style(message).cyan());
}

/// Print the latest release block.
pub fn print_release(release: &ReleaseInfo) {
    println!();
    println!("{}", style("Latest Release:").cyan());
    println!("  {} {}", style("Version:").yellow(), release.display_name());
    if let Some(version) = release.version() {
        println!("  {} {}", style("Semver:").yellow(), version);
    }
    println!(
        "  {} {} | ({})",
        style("Published:").yellow(),
        release.published_display(),
        release.age_display(Utc::now())
    );
    if let Some(url) = &release.html_url {
        println!("  {} {}", style("Page:").yellow(), url);
    }
    println!();
}

/// Print a retry-loop status line for one attempt.
pub fn print_attempt(report: &AttemptReport) {
    match &report.status {
        AttemptStatus::Succeeded { .. } => {}
        AttemptStatus::Retrying { reason } => {
            warning(&format!(
                "Download attempt {}/{} failed with error: {}",
                report.attempt, report.max_attempts, reason
            ));
            warning("Network error occurred. Retrying...");
        }
        AttemptStatus::Failed { reason } => {
            failure(&format!(
                "Download attempt {}/{} failed with error: {}",
                report.attempt, report.max_attempts, reason
            ));
        }
    }
}

/// Print what happened during extraction.
pub fn print_extraction(summary: &ExtractionSummary) {
    println!(
        "  {} files, {} directories, {} bytes",
        summary.files_written(),
        summary.directories_created(),
        summary.bytes_written()
    );
    let skipped = summary.skipped();
    if !skipped.is_empty() {
        warning(&format!("  {} entries skipped:", skipped.len()));
        for (name, reason) in skipped {
            println!("    - {}: {}", name, reason);
        }
    }
}

/// Spinner counting downloaded bytes; the total size is not known up front.
pub fn download_bar() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("  {spinner:.green} {msg} {bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message("Downloading");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Bar over archive entries; the length is set once entries are counted.
pub fn extract_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("  Extracting [{bar:40.cyan/blue}] {msg:>4} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar
}
