use crate::error::{Result, VersionGateError};
use crate::git::CommitIdentity;
use git2::build::CheckoutBuilder;
use git2::{Cred, CredentialType, ErrorCode, Oid, RemoteCallbacks, Repository as Git2Repo};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

/// Credentials for fetch and push.
///
/// A `GITHUB_TOKEN` (as exported in CI) is used over HTTPS; otherwise SSH keys
/// from the agent or `~/.ssh`, then libgit2's default credentials.
fn remote_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                return Cred::userpass_plaintext("x-access-token", &token);
            }
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            let user = username_from_url.unwrap_or("git");
            if let Ok(cred) = Cred::ssh_key_from_agent(user) {
                return Ok(cred);
            }
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(user, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }
        }

        Cred::default()
    });
    callbacks
}

/// Commit the remote currently advertises for `refname`
fn advertised_head(remote: &mut git2::Remote<'_>, refname: &str) -> Result<Option<Oid>> {
    let connection = remote
        .connect_auth(git2::Direction::Fetch, Some(remote_callbacks()), None)
        .map_err(|e| VersionGateError::remote(format!("Cannot connect to remote: {}", e)))?;

    let head = connection
        .list()?
        .iter()
        .find(|head| head.name() == refname)
        .map(|head| head.oid());
    Ok(head)
}

/// Whether a server-side ref rejection means the branch moved under us
fn is_non_fast_forward_status(status: &str) -> bool {
    let status = status.to_lowercase();
    status.contains("non-fast-forward")
        || status.contains("fetch first")
        || status.contains("stale info")
        || status.contains("not a fast-forward")
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| VersionGateError::config("Repository has no working tree (bare)"))
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| VersionGateError::remote(format!("Cannot find remote: {}", e)))?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        let refspec = format!("+refs/heads/{}:refs/remotes/{}/{}", branch, remote, branch);
        remote_handle
            .fetch(&[refspec.as_str()], Some(&mut fetch_options), None)
            .map_err(|e| VersionGateError::remote(format!("Fetch failed: {}", e)))?;

        debug!(remote, branch, "fetched");
        Ok(())
    }

    fn checkout_commit(&self, rev: &str) -> Result<Oid> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| {
                VersionGateError::precondition(format!("Cannot resolve commit '{}': {}", rev, e))
            })?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.repo
            .checkout_tree(commit.as_object(), Some(&mut checkout))?;
        self.repo.set_head_detached(commit.id())?;

        debug!(commit = %commit.id(), "checked out");
        Ok(commit.id())
    }

    fn read_file_at(&self, rev: &str, path: &Path) -> Result<String> {
        let tree = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_tree())
            .map_err(|e| {
                VersionGateError::precondition(format!("Cannot resolve commit '{}': {}", rev, e))
            })?;

        let entry = tree.get_path(path).map_err(|e| {
            VersionGateError::artifact(format!(
                "Cannot read {} at {}: {}",
                path.display(),
                rev,
                e
            ))
        })?;
        let blob = self.repo.find_blob(entry.id())?;

        String::from_utf8(blob.content().to_vec()).map_err(|e| {
            VersionGateError::artifact(format!(
                "{} at {} is not UTF-8: {}",
                path.display(),
                rev,
                e
            ))
        })
    }

    fn commit_paths(
        &self,
        paths: &[&Path],
        identity: &CommitIdentity,
        message: &str,
    ) -> Result<Oid> {
        let parent = self.repo.head()?.peel_to_commit()?;

        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(path)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        if tree_id == parent.tree_id() {
            return Err(VersionGateError::artifact(
                "Nothing to commit, the version artifact is unchanged",
            ));
        }
        let tree = self.repo.find_tree(tree_id)?;

        let signature = git2::Signature::now(&identity.name, &identity.email)?;
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        debug!(commit = %oid, parent = %parent.id(), "created commit");
        Ok(oid)
    }

    fn push_branch(&self, remote: &str, branch: &str, oid: Oid) -> Result<()> {
        let local_ref = format!("refs/heads/{}", branch);

        let mut remote_handle = self
            .repo
            .find_remote(remote)
            .map_err(|e| VersionGateError::remote(format!("Cannot find remote: {}", e)))?;

        // A re-run within the same second rebuilds a byte-identical commit,
        // which the remote would accept as a no-op push.
        if advertised_head(&mut remote_handle, &local_ref)? == Some(oid) {
            return Err(VersionGateError::conflict(
                branch,
                format!("remote already at {}, published by an earlier run", oid),
            ));
        }

        self.repo.reference(
            &local_ref,
            oid,
            true,
            &format!("version-gate: increment {}", branch),
        )?;

        let rejection: RefCell<Option<String>> = RefCell::new(None);
        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                warn!(refname, status, "remote rejected reference update");
                *rejection.borrow_mut() = Some(status.to_string());
            }
            Ok(())
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        // No leading '+': the remote must fast-forward or refuse.
        let refspec = format!("{}:{}", local_ref, local_ref);
        let pushed = remote_handle.push(&[refspec.as_str()], Some(&mut push_options));
        drop(push_options);

        match pushed {
            Err(e) if e.code() == ErrorCode::NotFastForward => {
                return Err(VersionGateError::conflict(branch, e.message()))
            }
            Err(e) if e.class() == git2::ErrorClass::Net => {
                return Err(VersionGateError::remote(format!(
                    "Network error during push: {}",
                    e
                )))
            }
            Err(e) => {
                return Err(VersionGateError::remote(format!(
                    "Failed to push '{}': {}",
                    branch, e
                )))
            }
            Ok(()) => {}
        }

        if let Some(status) = rejection.into_inner() {
            if is_non_fast_forward_status(&status) {
                return Err(VersionGateError::conflict(branch, status));
            }
            return Err(VersionGateError::remote(format!(
                "Remote rejected '{}': {}",
                branch, status
            )));
        }

        debug!(remote, branch, commit = %oid, "pushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_fast_forward_statuses() {
        assert!(is_non_fast_forward_status("non-fast-forward"));
        assert!(is_non_fast_forward_status("[rejected] (fetch first)"));
        assert!(is_non_fast_forward_status("stale info"));
        assert!(!is_non_fast_forward_status("pre-receive hook declined"));
        assert!(!is_non_fast_forward_status("protected branch hook declined"));
    }

    #[test]
    fn test_open_outside_repository_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("no-repo-here");
        assert!(Git2Repository::open(&nested).is_err());
    }
}
