//! GitHub Actions step outputs.
//!
//! Values are appended as `name=value` lines to the file named by
//! `$GITHUB_OUTPUT`, so later workflow steps can read the new version.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::apply::ApplyReport;
use crate::error::Result;

/// Environment variable holding the step output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Output pairs describing an apply run
pub fn apply_outputs(report: &ApplyReport) -> Vec<(&'static str, String)> {
    let mut outputs = vec![
        ("increment", report.increment.name().to_string()),
        ("previous-version", report.previous.to_string()),
        ("version", report.current.to_string()),
    ];
    if let Some(commit) = &report.commit {
        outputs.push(("commit", commit.clone()));
    }
    outputs
}

/// Append outputs to a step output file
pub fn write_outputs(path: &Path, outputs: &[(&str, String)]) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in outputs {
        writeln!(file, "{}={}", name, value)?;
    }
    Ok(())
}
