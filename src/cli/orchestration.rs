//! Event dispatch
//!
//! Routes one pull request event to the gate path, the apply path, or ignores
//! it. This keeps argument parsing in main.rs apart from policy, and lets the
//! workflow run against any [Repository].

use tracing::{info, warn};

use crate::apply::{ApplyReport, Applicator};
use crate::boundary::PolicyWarning;
use crate::config::Config;
use crate::domain::{BranchContext, EventKind, PullRequestEvent};
use crate::error::Result;
use crate::gate::{self, GateVerdict};
use crate::git::Repository;

/// What handling one event produced
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Gate path verdict
    Gate(GateVerdict),
    /// Apply path report
    Applied(ApplyReport),
    /// The event does not concern this engine
    Ignored(PolicyWarning),
}

/// Result of a dispatched event
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub outcome: EventOutcome,
    /// Non-fatal findings to show the user
    pub warnings: Vec<PolicyWarning>,
}

impl WorkflowResult {
    fn ignored(warning: PolicyWarning) -> Self {
        info!(%warning, "event ignored");
        WorkflowResult {
            outcome: EventOutcome::Ignored(warning),
            warnings: Vec::new(),
        }
    }
}

/// Handle one pull request event
///
/// `open_repo` is only called for merged pull requests, so the gate path
/// never needs a git repository.
///
/// # Arguments
///
/// * `event` - The pull request event to handle
/// * `config` - version-gate configuration
/// * `dry_run` - Compute the increment without writing or pushing
/// * `open_repo` - Opens the repository the apply path works in
pub fn handle_event<R, F>(
    event: &PullRequestEvent,
    config: &Config,
    dry_run: bool,
    open_repo: F,
) -> Result<WorkflowResult>
where
    R: Repository,
    F: FnOnce() -> Result<R>,
{
    info!(
        pull_request = event.number,
        action = %event.action,
        base = %event.base_branch,
        "handling pull request event"
    );

    let branch = BranchContext::new(&event.base_branch, &config.target_branch);
    if !branch.is_gated() {
        return Ok(WorkflowResult::ignored(PolicyWarning::UntrackedBranch {
            base: event.base_branch.clone(),
            target: config.target_branch.clone(),
        }));
    }

    let mut warnings = Vec::new();
    let present = event.labels.reserved();
    if present.len() > 1 {
        let warning = PolicyWarning::AmbiguousLabels {
            number: event.number,
            present,
            chosen: event.labels.classify(),
        };
        warn!(%warning, "ambiguous version labels");
        warnings.push(warning);
    }

    let outcome = match event.kind {
        kind if kind.is_gate_trigger() => EventOutcome::Gate(gate::evaluate(&event.labels)),
        EventKind::Closed if event.merged => {
            let repo = open_repo()?;
            let report = Applicator::new(&repo, config)
                .dry_run(dry_run)
                .apply(event)?;
            EventOutcome::Applied(report)
        }
        EventKind::Closed => {
            return Ok(WorkflowResult::ignored(PolicyWarning::ClosedWithoutMerge {
                number: event.number,
            }))
        }
        _ => {
            return Ok(WorkflowResult::ignored(PolicyWarning::UnhandledAction {
                action: event.action.clone(),
            }))
        }
    };

    Ok(WorkflowResult { outcome, warnings })
}
