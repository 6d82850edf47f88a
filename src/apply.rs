//! The mutating apply path, run once a gated pull request has merged.
//!
//! Each run loads the artifact fresh from the checked-out merge commit,
//! increments it through [VersionArtifact::increment], commits only the
//! artifact file and pushes without force. A push that the remote refuses
//! because the branch moved is returned as a conflict; it is not retried.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::artifact::ArtifactFile;
use crate::config::Config;
use crate::domain::{IncrementKind, PullRequestEvent, VersionArtifact};
use crate::error::{Result, VersionGateError};
use crate::git::{CommitIdentity, Repository};
use crate::hooks::{HookContext, HookExecutor, HookType};

/// What an apply run did
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReport {
    pub pull_request: u64,
    pub increment: IncrementKind,
    pub previous: VersionArtifact,
    pub current: VersionArtifact,
    /// Increment commit; `None` on a dry run
    pub commit: Option<String>,
    pub pushed: bool,
}

/// Applies the merged pull request's increment to the version artifact
pub struct Applicator<'a, R: Repository> {
    repo: &'a R,
    config: &'a Config,
    dry_run: bool,
}

impl<'a, R: Repository> Applicator<'a, R> {
    pub fn new(repo: &'a R, config: &'a Config) -> Self {
        Applicator {
            repo,
            config,
            dry_run: false,
        }
    }

    /// Compute and report the increment without writing, committing or pushing
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the apply path for a closed-and-merged pull request event
    pub fn apply(&self, event: &PullRequestEvent) -> Result<ApplyReport> {
        if !event.is_merge() {
            return Err(VersionGateError::precondition(format!(
                "pull request #{} is not merged (action '{}')",
                event.number, event.action
            )));
        }
        let merge_sha = event.merge_commit_sha.as_deref().ok_or_else(|| {
            VersionGateError::precondition(format!(
                "pull request #{} has no merge commit",
                event.number
            ))
        })?;

        if self.config.fetch {
            self.repo
                .fetch(&self.config.remote, &self.config.target_branch)?;
        }

        let workdir = self.repo.workdir()?;
        let artifact = ArtifactFile::in_workdir(&workdir, &self.config.artifact.path)?;

        if self.dry_run {
            // Read from the merge commit's tree; HEAD and the working tree stay as they are
            let increment = required_increment(event)?;
            let content = self
                .repo
                .read_file_at(merge_sha, &self.config.artifact.path)?;
            let previous = artifact.decode(&content)?;
            let current = previous.increment(increment)?;
            info!(%previous, %current, %increment, "dry run, nothing written");
            return Ok(ApplyReport {
                pull_request: event.number,
                increment,
                previous,
                current,
                commit: None,
                pushed: false,
            });
        }

        let base = self.repo.checkout_commit(merge_sha)?;
        info!(pull_request = event.number, commit = %base, "checked out merge commit");

        let increment = required_increment(event)?;
        let previous = artifact.load()?;
        let current = previous.increment(increment)?;
        info!(%previous, %current, %increment, "computed version increment");

        let mut report = ApplyReport {
            pull_request: event.number,
            increment,
            previous,
            current,
            commit: None,
            pushed: false,
        };

        artifact.store(&current)?;

        let mut hook_context = HookContext {
            hook_type: HookType::PreCommit,
            branch: self.config.target_branch.clone(),
            remote: self.config.remote.clone(),
            pull_request: event.number,
            increment,
            previous_version: previous,
            new_version: current,
            commit: None,
        };
        if let Some(script) = &self.config.hooks.pre_commit {
            HookExecutor::execute(&hook_script(&workdir, script), &workdir, &hook_context)?;
        }

        let identity = CommitIdentity::new(
            &self.config.commit.author_name,
            &self.config.commit.author_email,
        );
        let oid = self.repo.commit_paths(
            &[self.config.artifact.path.as_path()],
            &identity,
            &self.config.commit.message,
        )?;
        report.commit = Some(oid.to_string());

        if let Err(e) = self
            .repo
            .push_branch(&self.config.remote, &self.config.target_branch, oid)
        {
            if e.is_conflict() {
                warn!(
                    branch = %self.config.target_branch,
                    "target branch moved since checkout or already holds this increment, not published"
                );
            }
            return Err(e);
        }
        report.pushed = true;
        info!(commit = %oid, version = %current, "published version increment");

        if let Some(script) = &self.config.hooks.post_push {
            hook_context.hook_type = HookType::PostPush;
            hook_context.commit = Some(oid.to_string());
            HookExecutor::execute_permissive(&hook_script(&workdir, script), &workdir, &hook_context);
        }

        Ok(report)
    }
}

/// Classify the merged label set; merging without a reserved label is an error
fn required_increment(event: &PullRequestEvent) -> Result<IncrementKind> {
    let increment = event.labels.classify();
    if increment.is_none() {
        return Err(VersionGateError::precondition(format!(
            "pull request #{} was merged without a version increment label",
            event.number
        )));
    }
    Ok(increment)
}

/// Hook paths in the config are relative to the repository root
fn hook_script(workdir: &Path, script: &str) -> String {
    let path = Path::new(script);
    let resolved: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workdir.join(path)
    };
    resolved.to_string_lossy().to_string()
}
