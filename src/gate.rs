//! The non-mutating merge gate.
//!
//! Every gate-triggering event is evaluated on its own: the verdict depends on
//! the label set carried by that event and nothing else.

use std::fmt;

use tracing::{info, warn};

use crate::domain::{IncrementKind, LabelSet};

/// Diagnostic reported when a pull request has no reserved label
pub const NO_LABEL_DIAGNOSTIC: &str = "no version increment label set";

/// Outcome of one gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateVerdict {
    /// The merge may proceed; the increment it will get on merge
    Pass(IncrementKind),
    /// The merge is blocked
    Fail,
}

impl GateVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, GateVerdict::Pass(_))
    }

    /// Human-readable reason for a failing verdict
    pub fn diagnostic(&self) -> Option<&'static str> {
        match self {
            GateVerdict::Pass(_) => None,
            GateVerdict::Fail => Some(NO_LABEL_DIAGNOSTIC),
        }
    }
}

impl fmt::Display for GateVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateVerdict::Pass(kind) => write!(f, "pass ({} increment)", kind),
            GateVerdict::Fail => write!(f, "fail ({})", NO_LABEL_DIAGNOSTIC),
        }
    }
}

/// Evaluate the gate for a pull request's current labels
pub fn evaluate(labels: &LabelSet) -> GateVerdict {
    let verdict = match labels.classify() {
        IncrementKind::None => GateVerdict::Fail,
        kind => GateVerdict::Pass(kind),
    };

    match verdict {
        GateVerdict::Pass(kind) => info!(increment = %kind, "version gate passed"),
        GateVerdict::Fail => {
            warn!(labels = labels.len(), "version gate failed, no reserved label")
        }
    }
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> LabelSet {
        names.iter().copied().collect()
    }

    #[test]
    fn test_no_labels_fails_with_diagnostic() {
        let verdict = evaluate(&LabelSet::new());
        assert_eq!(verdict, GateVerdict::Fail);
        assert!(!verdict.is_pass());
        assert_eq!(verdict.diagnostic(), Some("no version increment label set"));
    }

    #[test]
    fn test_unreserved_labels_fail() {
        let verdict = evaluate(&labels(&["bug", "enhancement"]));
        assert_eq!(verdict, GateVerdict::Fail);
    }

    #[test]
    fn test_reserved_label_passes() {
        assert_eq!(
            evaluate(&labels(&["patch-increment"])),
            GateVerdict::Pass(IncrementKind::Patch)
        );
        assert_eq!(
            evaluate(&labels(&["bug", "major-increment"])),
            GateVerdict::Pass(IncrementKind::Major)
        );
        assert_eq!(GateVerdict::Pass(IncrementKind::Minor).diagnostic(), None);
    }

    #[test]
    fn test_ambiguous_labels_pass_with_most_severe() {
        let verdict = evaluate(&labels(&["patch-increment", "minor-increment"]));
        assert_eq!(verdict, GateVerdict::Pass(IncrementKind::Minor));
    }

    #[test]
    fn test_reevaluation_is_stable() {
        for set in [
            labels(&[]),
            labels(&["docs"]),
            labels(&["minor-increment"]),
            labels(&["patch-increment", "major-increment"]),
        ] {
            let first = evaluate(&set);
            for _ in 0..3 {
                assert_eq!(evaluate(&set), first);
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            GateVerdict::Fail.to_string(),
            "fail (no version increment label set)"
        );
        assert_eq!(
            GateVerdict::Pass(IncrementKind::Patch).to_string(),
            "pass (patch increment)"
        );
    }
}
