use std::fmt;

use crate::domain::IncrementKind;

/// Non-fatal conditions met while handling a pull request event.
/// These are reported to the user but never fail the run.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyWarning {
    /// More than one reserved label; the most severe one is used
    AmbiguousLabels {
        number: u64,
        present: Vec<IncrementKind>,
        chosen: IncrementKind,
    },
    /// The pull request targets a branch that is not gated
    UntrackedBranch { base: String, target: String },
    /// The pull request was closed without being merged
    ClosedWithoutMerge { number: u64 },
    /// The host reported an action this engine does not handle
    UnhandledAction { action: String },
}

impl fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyWarning::AmbiguousLabels {
                number,
                present,
                chosen,
            } => {
                let labels: Vec<&str> = present.iter().filter_map(|k| k.label()).collect();
                write!(
                    f,
                    "Pull request #{} has several version labels ({}); using '{}'",
                    number,
                    labels.join(", "),
                    chosen.label().unwrap_or("none")
                )
            }
            PolicyWarning::UntrackedBranch { base, target } => {
                write!(
                    f,
                    "Pull request targets '{}', only '{}' is gated",
                    base, target
                )
            }
            PolicyWarning::ClosedWithoutMerge { number } => {
                write!(f, "Pull request #{} was closed without merging", number)
            }
            PolicyWarning::UnhandledAction { action } => {
                write!(f, "Ignoring pull request action '{}'", action)
            }
        }
    }
}
