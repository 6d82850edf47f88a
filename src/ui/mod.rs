//! User interface module - formatting of gate and apply results.
//!
//! version-gate runs unattended in CI, so there are no prompts; everything
//! here is output.

pub mod formatter;

pub use formatter::{
    display_apply_report, display_error, display_gate_verdict, display_policy_warning,
    display_status, display_success, display_version, format_gate_verdict, format_version_change,
};
