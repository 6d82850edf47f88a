use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{IncrementKind, VersionArtifact};

/// Types of hooks available in the apply path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookType {
    PreCommit,
    PostPush,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreCommit => "pre-commit",
            HookType::PostPush => "post-push",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    /// Type of hook being executed
    pub hook_type: HookType,
    /// Branch receiving the increment commit
    pub branch: String,
    /// Remote repository name
    pub remote: String,
    /// Number of the merged pull request
    pub pull_request: u64,
    pub increment: IncrementKind,
    pub previous_version: VersionArtifact,
    pub new_version: VersionArtifact,
    /// Increment commit, once created
    pub commit: Option<String>,
}

impl HookContext {
    /// Convert context to environment variables for the hook script
    ///
    /// Maps context fields to VERSIONGATE_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("VERSIONGATE_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert("VERSIONGATE_BRANCH".to_string(), self.branch.clone());
        env.insert("VERSIONGATE_REMOTE".to_string(), self.remote.clone());
        env.insert(
            "VERSIONGATE_PULL_REQUEST".to_string(),
            self.pull_request.to_string(),
        );
        env.insert(
            "VERSIONGATE_INCREMENT".to_string(),
            self.increment.name().to_string(),
        );
        env.insert(
            "VERSIONGATE_PREVIOUS_VERSION".to_string(),
            self.previous_version.to_string(),
        );
        env.insert(
            "VERSIONGATE_VERSION".to_string(),
            self.new_version.to_string(),
        );

        if let Some(ref commit) = self.commit {
            env.insert("VERSIONGATE_COMMIT".to_string(), commit.clone());
        }

        env
    }
}
