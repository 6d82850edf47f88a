use crate::domain::LabelSet;
use crate::error::{Result, VersionGateError};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Pull request lifecycle action reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Opened,
    Labeled,
    Unlabeled,
    Synchronize,
    Reopened,
    Closed,
    /// Any action this engine does not react to (edited, assigned, ...)
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Whether this action re-runs the gate check
    pub fn is_gate_trigger(&self) -> bool {
        matches!(
            self,
            EventKind::Opened
                | EventKind::Labeled
                | EventKind::Unlabeled
                | EventKind::Synchronize
                | EventKind::Reopened
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Opened => "opened",
            EventKind::Labeled => "labeled",
            EventKind::Unlabeled => "unlabeled",
            EventKind::Synchronize => "synchronize",
            EventKind::Reopened => "reopened",
            EventKind::Closed => "closed",
            EventKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// A single pull request lifecycle notification
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestEvent {
    pub kind: EventKind,
    /// The raw action string, kept for diagnostics on unhandled actions
    pub action: String,
    pub number: u64,
    pub labels: LabelSet,
    /// Only meaningful when `kind` is `Closed`
    pub merged: bool,
    /// Branch the pull request targets
    pub base_branch: String,
    pub merge_commit_sha: Option<String>,
}

impl PullRequestEvent {
    /// Whether this is the terminal closed-and-merged event
    pub fn is_merge(&self) -> bool {
        self.kind == EventKind::Closed && self.merged
    }

    /// Parse a GitHub `pull_request` webhook payload
    pub fn from_json(payload: &str) -> Result<Self> {
        let raw: RawEvent = serde_json::from_str(payload)
            .map_err(|e| VersionGateError::event(format!("Invalid pull_request payload: {}", e)))?;

        let kind: EventKind =
            serde_json::from_value(serde_json::Value::String(raw.action.clone()))
                .unwrap_or(EventKind::Other);

        Ok(PullRequestEvent {
            kind,
            action: raw.action,
            number: raw.pull_request.number,
            labels: raw.pull_request.labels.into_iter().map(|l| l.name).collect(),
            merged: raw.pull_request.merged.unwrap_or(false),
            base_branch: raw.pull_request.base.branch,
            merge_commit_sha: raw.pull_request.merge_commit_sha,
        })
    }

    /// Read and parse an event payload file (e.g. `$GITHUB_EVENT_PATH`)
    pub fn from_file(path: &Path) -> Result<Self> {
        let payload = fs::read_to_string(path).map_err(|e| {
            VersionGateError::event(format!("Cannot read event file {}: {}", path.display(), e))
        })?;
        Self::from_json(&payload)
    }
}

#[derive(Deserialize)]
struct RawEvent {
    action: String,
    pull_request: RawPullRequest,
}

#[derive(Deserialize)]
struct RawPullRequest {
    number: u64,
    #[serde(default)]
    labels: Vec<RawLabel>,
    #[serde(default)]
    merged: Option<bool>,
    #[serde(default)]
    merge_commit_sha: Option<String>,
    base: RawRef,
}

#[derive(Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Deserialize)]
struct RawRef {
    #[serde(rename = "ref")]
    branch: String,
}
