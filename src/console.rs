//! User-facing lines on stdout, separate from `tracing` diagnostics.

use std::path::Path;

use colored::Colorize;
use supports_color::Stream;

use crate::filesystem::{EntryOutcome, MaterializationReport};

/// Enables colours only when stdout is a terminal that supports them.
pub fn configure_color() {
    let supported = supports_color::on(Stream::Stdout).is_some();
    colored::control::set_override(supported);
}

pub fn print_entry(outcome: EntryOutcome, path: &Path) {
    let label = outcome.to_string();
    let label = match outcome {
        EntryOutcome::CreatedDirectory | EntryOutcome::CreatedFile => label.green(),
        EntryOutcome::PlannedDirectory | EntryOutcome::PlannedFile => label.cyan(),
        EntryOutcome::ExistingDirectory | EntryOutcome::ExistingFile { .. } => label.dimmed(),
    };
    println!("{}: {}", label, path.display());
}

pub fn print_summary(report: &MaterializationReport) {
    let summary = report.to_string();
    if report.divergent().next().is_some() {
        println!("{}", summary.yellow());
    } else {
        println!("{}", summary.bold());
    }
}
