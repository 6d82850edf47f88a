//! Git operations abstraction layer
//!
//! The apply path needs a small set of repository operations: fetch, check out
//! the merge commit, commit the version artifact and push the result. They are
//! expressed by the [Repository] trait so the apply logic can run against a
//! real repository or an in-memory one.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! Pushes are never forced. A push the remote rejects as non-fast-forward is
//! reported as [crate::error::VersionGateError::ConcurrentMutationConflict];
//! no lock is taken, the remote's ref update check is the only guard.

pub mod mock;
pub mod repository;

pub use mock::{MockRemote, MockRepository};
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;
use std::path::{Path, PathBuf};

/// Author and committer used for the increment commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl CommitIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        CommitIdentity {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Common git operation trait for abstraction
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::VersionGateError] variants.
pub trait Repository {
    /// Root of the working tree
    fn workdir(&self) -> Result<PathBuf>;

    /// Fetch the given branch from a remote into its remote-tracking ref
    ///
    /// # Arguments
    /// * `remote` - Name of the remote (e.g., "origin")
    /// * `branch` - Branch to fetch (e.g., "main")
    fn fetch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Check out `rev` as a detached HEAD, discarding local changes
    ///
    /// # Returns
    /// * `Ok(Oid)` - The commit now at HEAD
    /// * `Err` - If `rev` does not resolve to a commit
    fn checkout_commit(&self, rev: &str) -> Result<Oid>;

    /// Read a file as it is in the tree of `rev`, leaving HEAD and the
    /// working tree alone
    ///
    /// # Arguments
    /// * `rev` - Commit to read from
    /// * `path` - Path relative to the repository root
    fn read_file_at(&self, rev: &str, path: &Path) -> Result<String>;

    /// Commit the given paths on top of HEAD
    ///
    /// Only the listed paths are staged; the commit's parent is the current
    /// HEAD and HEAD moves to the new commit.
    ///
    /// # Arguments
    /// * `paths` - Paths relative to the working tree root
    /// * `identity` - Author and committer of the commit
    /// * `message` - Commit message
    fn commit_paths(&self, paths: &[&Path], identity: &CommitIdentity, message: &str)
        -> Result<Oid>;

    /// Point `branch` at `oid` and push it to `remote` without forcing
    ///
    /// # Returns
    /// * `Ok(())` - The remote accepted the update
    /// * `Err(ConcurrentMutationConflict)` - The remote branch has moved, or
    ///   already points at `oid` (an earlier run published the same commit)
    /// * `Err` - Any other remote or Git error
    fn push_branch(&self, remote: &str, branch: &str, oid: Oid) -> Result<()>;
}
