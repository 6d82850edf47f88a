use crate::error::{Result, VersionGateError};
use crate::git::{CommitIdentity, Repository};
use git2::Oid;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// A commit recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct MockCommit {
    pub oid: Oid,
    pub parent: Oid,
    pub paths: Vec<PathBuf>,
    pub identity: CommitIdentity,
    pub message: String,
}

#[derive(Debug, Default)]
struct RemoteState {
    heads: HashMap<String, Oid>,
    commits: HashMap<Oid, MockCommit>,
    next_id: u8,
}

/// Shared in-memory remote with fast-forward-only branch updates.
///
/// Cloning a `MockRemote` yields another handle on the same state, so several
/// [MockRepository] instances can race on one branch.
#[derive(Debug, Clone, Default)]
pub struct MockRemote {
    state: Arc<Mutex<RemoteState>>,
}

impl MockRemote {
    pub fn new() -> Self {
        MockRemote::default()
    }

    fn lock(&self) -> MutexGuard<'_, RemoteState> {
        // A panicking test thread must not hide the state from the others
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Set a branch head directly
    pub fn set_branch_head(&self, branch: impl Into<String>, oid: Oid) {
        self.lock().heads.insert(branch.into(), oid);
    }

    /// Current head of a branch on the remote
    pub fn branch_head(&self, branch: &str) -> Option<Oid> {
        self.lock().heads.get(branch).copied()
    }

    /// Look up a commit that was pushed to the remote
    pub fn commit(&self, oid: Oid) -> Option<MockCommit> {
        self.lock().commits.get(&oid).cloned()
    }

    /// Number of commits the remote accepted
    pub fn pushed_commit_count(&self) -> usize {
        self.lock().commits.len()
    }

    fn allocate_oid(&self) -> Oid {
        let mut state = self.lock();
        state.next_id = state.next_id.wrapping_add(1);
        let mut bytes = [0xc0u8; 20];
        bytes[19] = state.next_id;
        Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero())
    }
}

#[derive(Debug, Default)]
struct LocalState {
    head: Option<Oid>,
    commits: HashMap<Oid, MockCommit>,
    fetches: Vec<(String, String)>,
}

/// Mock repository for testing without actual git operations
///
/// The working tree is a real directory so the version artifact can be read
/// and written; history lives in memory.
pub struct MockRepository {
    workdir: PathBuf,
    remote: MockRemote,
    state: RefCell<LocalState>,
}

impl MockRepository {
    /// Create a mock repository working in `workdir` and pushing to `remote`
    pub fn new(workdir: impl Into<PathBuf>, remote: MockRemote) -> Self {
        MockRepository {
            workdir: workdir.into(),
            remote,
            state: RefCell::new(LocalState::default()),
        }
    }

    /// The commit at HEAD, if anything was checked out
    pub fn head(&self) -> Option<Oid> {
        self.state.borrow().head
    }

    /// Commits created locally, in no particular order
    pub fn local_commits(&self) -> Vec<MockCommit> {
        self.state.borrow().commits.values().cloned().collect()
    }

    /// (remote, branch) pairs fetched so far
    pub fn fetches(&self) -> Vec<(String, String)> {
        self.state.borrow().fetches.clone()
    }

    fn ancestry(&self, oid: Oid) -> Vec<Oid> {
        let state = self.state.borrow();
        let mut chain = vec![oid];
        let mut current = oid;
        while let Some(commit) = state.commits.get(&current) {
            chain.push(commit.parent);
            current = commit.parent;
        }
        chain
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .fetches
            .push((remote.to_string(), branch.to_string()));
        Ok(())
    }

    fn checkout_commit(&self, rev: &str) -> Result<Oid> {
        let oid = Oid::from_str(rev).map_err(|e| {
            VersionGateError::precondition(format!("Cannot resolve commit '{}': {}", rev, e))
        })?;
        self.state.borrow_mut().head = Some(oid);
        Ok(oid)
    }

    fn read_file_at(&self, rev: &str, path: &Path) -> Result<String> {
        Oid::from_str(rev).map_err(|e| {
            VersionGateError::precondition(format!("Cannot resolve commit '{}': {}", rev, e))
        })?;
        // History is not tracked, every revision reads the working tree
        let full = self.workdir.join(path);
        fs::read_to_string(&full).map_err(|e| {
            VersionGateError::artifact(format!("Cannot read {}: {}", full.display(), e))
        })
    }

    fn commit_paths(
        &self,
        paths: &[&Path],
        identity: &CommitIdentity,
        message: &str,
    ) -> Result<Oid> {
        let parent = self
            .head()
            .ok_or_else(|| VersionGateError::config("Nothing checked out"))?;
        let oid = self.remote.allocate_oid();

        let commit = MockCommit {
            oid,
            parent,
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            identity: identity.clone(),
            message: message.to_string(),
        };

        let mut state = self.state.borrow_mut();
        state.commits.insert(oid, commit);
        state.head = Some(oid);
        Ok(oid)
    }

    fn push_branch(&self, _remote: &str, branch: &str, oid: Oid) -> Result<()> {
        let ancestry = self.ancestry(oid);

        let mut remote = self.remote.lock();
        if let Some(current) = remote.heads.get(branch) {
            if *current == oid {
                return Err(VersionGateError::conflict(
                    branch,
                    format!("remote already at {}", oid),
                ));
            }
            if !ancestry.contains(current) {
                return Err(VersionGateError::conflict(
                    branch,
                    format!("remote is at {}, not an ancestor of {}", current, oid),
                ));
            }
        }

        let state = self.state.borrow();
        for ancestor in &ancestry {
            if let Some(commit) = state.commits.get(ancestor) {
                remote.commits.insert(*ancestor, commit.clone());
            }
        }
        remote.heads.insert(branch.to_string(), oid);
        Ok(())
    }
}
