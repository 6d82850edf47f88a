// Shared fixtures: a bare "remote" seeded with a version artifact, plus clones.
#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestRemote {
    pub root: TempDir,
    pub bare_path: PathBuf,
    pub base: Oid,
}

impl TestRemote {
    /// Create a bare remote whose `main` holds `version.json` with `version`
    pub fn with_version(major: u32, minor: u32, patch: u32) -> Self {
        let root = TempDir::new().expect("Could not create temp dir");
        let bare_path = root.path().join("remote.git");
        let bare = Repository::init_bare(&bare_path).expect("Could not init bare repo");

        let seed_path = root.path().join("seed");
        let seed = Repository::init(&seed_path).expect("Could not init seed repo");

        fs::write(
            seed_path.join("version.json"),
            format!(
                "{{\n  \"major\": {},\n  \"minor\": {},\n  \"patch\": {}\n}}\n",
                major, minor, patch
            ),
        )
        .expect("Could not write version.json");
        fs::write(seed_path.join("README.md"), "demo package\n").expect("Could not write README");

        let mut index = seed.index().expect("Could not get index");
        index
            .add_path(Path::new("version.json"))
            .expect("Could not add version.json");
        index
            .add_path(Path::new("README.md"))
            .expect("Could not add README.md");
        index.write().expect("Could not write index");
        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = seed.find_tree(tree_id).expect("Could not find tree");

        let sig = Signature::now("Test User", "test@example.com").expect("Could not get sig");
        let base = seed
            .commit(
                Some("refs/heads/main"),
                &sig,
                &sig,
                "Merge pull request #1",
                &tree,
                &[],
            )
            .expect("Could not create commit");
        seed.set_head("refs/heads/main").expect("Could not set HEAD");

        let mut origin = seed
            .remote("origin", bare_path.to_str().expect("utf-8 path"))
            .expect("Could not add remote");
        origin
            .push(&["refs/heads/main:refs/heads/main"], None)
            .expect("Could not push seed commit");
        bare.set_head("refs/heads/main")
            .expect("Could not set remote HEAD");

        TestRemote {
            root,
            bare_path,
            base,
        }
    }

    /// Clone the remote into a new working directory
    pub fn clone_as(&self, name: &str) -> PathBuf {
        let path = self.root.path().join(name);
        Repository::clone(self.bare_path.to_str().expect("utf-8 path"), &path)
            .expect("Could not clone remote");
        path
    }

    pub fn bare(&self) -> Repository {
        Repository::open_bare(&self.bare_path).expect("Could not open bare repo")
    }

    pub fn main_head(&self) -> Oid {
        self.bare()
            .refname_to_id("refs/heads/main")
            .expect("main should exist")
    }

    /// Content of `version.json` at the remote's `main`
    pub fn version_at_main(&self) -> serde_json::Value {
        let bare = self.bare();
        let commit = bare.find_commit(self.main_head()).expect("commit");
        let entry = commit
            .tree()
            .expect("tree")
            .get_path(Path::new("version.json"))
            .expect("version.json in tree");
        let blob = bare.find_blob(entry.id()).expect("blob");
        serde_json::from_slice(blob.content()).expect("valid json")
    }

    /// Paths changed by the commit at `main` relative to its parent
    pub fn files_changed_at_main(&self) -> Vec<String> {
        let bare = self.bare();
        let commit = bare.find_commit(self.main_head()).expect("commit");
        let parent = commit.parent(0).expect("parent");
        let diff = bare
            .diff_tree_to_tree(
                Some(&parent.tree().expect("tree")),
                Some(&commit.tree().expect("tree")),
                None,
            )
            .expect("diff");
        diff.deltas()
            .filter_map(|d| d.new_file().path().map(|p| p.to_string_lossy().to_string()))
            .collect()
    }
}

/// A GitHub `pull_request` payload
pub fn pull_request_payload(
    action: &str,
    number: u64,
    labels: &[&str],
    merged: bool,
    merge_commit_sha: Option<&str>,
) -> String {
    let labels: Vec<serde_json::Value> = labels
        .iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();
    serde_json::json!({
        "action": action,
        "number": number,
        "pull_request": {
            "number": number,
            "labels": labels,
            "merged": merged,
            "merge_commit_sha": merge_commit_sha,
            "base": { "ref": "main" },
            "head": { "ref": "feature" }
        }
    })
    .to_string()
}
