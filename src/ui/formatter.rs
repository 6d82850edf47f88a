//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text and are testable; `display_*`
//! functions print it. Styling goes through `console`, which drops colors
//! when the output is not a terminal (as in CI logs).

use console::style;

use crate::apply::ApplyReport;
use crate::boundary::PolicyWarning;
use crate::domain::{IncrementKind, VersionArtifact};
use crate::gate::GateVerdict;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a policy warning to the user.
pub fn display_policy_warning(warning: &PolicyWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Text for a gate verdict
pub fn format_gate_verdict(pull_request: u64, verdict: &GateVerdict) -> String {
    match verdict {
        GateVerdict::Pass(kind) => format!(
            "Pull request #{} will receive a {} increment on merge",
            pull_request, kind
        ),
        GateVerdict::Fail => format!(
            "Pull request #{}: {}. Add one of: {}",
            pull_request,
            verdict.diagnostic().unwrap_or_default(),
            reserved_label_list()
        ),
    }
}

/// Display a gate verdict; failures go to stderr
pub fn display_gate_verdict(pull_request: u64, verdict: &GateVerdict) {
    let text = format_gate_verdict(pull_request, verdict);
    if verdict.is_pass() {
        display_success(&text);
    } else {
        display_error(&text);
    }
}

/// Text for the version change of an apply run
pub fn format_version_change(report: &ApplyReport) -> String {
    format!(
        "{} increment for #{}: {} -> {}",
        report.increment, report.pull_request, report.previous, report.current
    )
}

/// Display the outcome of an apply run.
///
/// Shows the version change, then the commit and whether it was pushed.
pub fn display_apply_report(report: &ApplyReport) {
    println!("\n{}", style("Version Increment:").bold());
    println!("  From: {}", style(report.previous).red());
    println!("  To:   {}", style(report.current).green());

    match (&report.commit, report.pushed) {
        (Some(commit), true) => {
            display_success(&format!("Pushed {} ({})", commit, format_version_change(report)))
        }
        (Some(commit), false) => display_status(&format!("Committed {} locally", commit)),
        (None, _) => display_status(&format!(
            "Dry run, nothing written ({})",
            format_version_change(report)
        )),
    }
}

/// Display the current version
pub fn display_version(version: &VersionArtifact) {
    println!("{}", version);
}

fn reserved_label_list() -> String {
    [IncrementKind::Major, IncrementKind::Minor, IncrementKind::Patch]
        .iter()
        .filter_map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(", ")
}
