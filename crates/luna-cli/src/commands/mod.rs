//! Command implementations for luna-cli

pub mod install;
pub mod open;
pub mod remove;
pub mod snippets;
pub mod status;
pub mod telemetry;

pub use install::run_install;
pub use open::run_open;
pub use remove::run_remove;
pub use snippets::run_snippets;
pub use status::run_status;
pub use telemetry::run_telemetry;

use colored::Colorize;
use luna_typings::{EntryFailure, InstallReport};

use crate::error::{CliError, Result};

/// Print an install report and turn entry failures into an error exit.
pub(crate) fn print_install_report(report: &InstallReport) -> Result<()> {
    for reference in &report.installed {
        println!("  {} {}", "+".green(), reference);
    }
    for reference in &report.already_present {
        println!("  {} {} (already installed)", "=".dimmed(), reference);
    }
    for reference in &report.user_override {
        println!("  {} {} (user copy in project)", "=".dimmed(), reference);
    }
    print_failures(&report.failed);
    if let Some(e) = &report.index_error {
        println!("  {} reference index: {}", "!".yellow(), e);
    }
    if let Some(index) = &report.index_path {
        if !report.references_added.is_empty() {
            println!(
                "{} {} reference(s) added to {}",
                "OK".green().bold(),
                report.references_added.len(),
                index
            );
        }
    }

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} declaration(s) could not be installed",
            report.failed.len()
        )))
    }
}

pub(crate) fn print_failures(failures: &[EntryFailure]) {
    for failure in failures {
        println!("  {} {}: {}", "x".red(), failure.reference, failure.error);
    }
}
