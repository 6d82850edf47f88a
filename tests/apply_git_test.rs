// tests/apply_git_test.rs
mod common;

use common::{pull_request_payload, TestRemote};
use git2::Repository;
use version_gate::apply::Applicator;
use version_gate::config::Config;
use version_gate::domain::{PullRequestEvent, VersionArtifact};
use version_gate::git::Git2Repository;

fn merged_event(remote: &TestRemote, number: u64, label: &str) -> PullRequestEvent {
    let sha = remote.base.to_string();
    PullRequestEvent::from_json(&pull_request_payload(
        "closed",
        number,
        &[label],
        true,
        Some(&sha),
    ))
    .expect("valid payload")
}

#[test]
fn test_apply_pushes_single_artifact_commit() {
    let remote = TestRemote::with_version(1, 4, 7);
    let workdir = remote.clone_as("runner");
    let repo = Git2Repository::open(&workdir).unwrap();
    let config = Config::default();

    let report = Applicator::new(&repo, &config)
        .apply(&merged_event(&remote, 2, "patch-increment"))
        .unwrap();

    assert_eq!(report.current, VersionArtifact::new(1, 4, 8));
    assert!(report.pushed);

    let head = remote.main_head();
    assert_eq!(Some(head.to_string()), report.commit);

    let bare = remote.bare();
    let commit = bare.find_commit(head).unwrap();
    assert_eq!(commit.parent_id(0).unwrap(), remote.base);
    assert_eq!(commit.parent_count(), 1);
    assert_eq!(commit.message(), Some("Increment package version"));
    assert_eq!(commit.author().name(), Some("github-actions[bot]"));

    assert_eq!(remote.files_changed_at_main(), vec!["version.json"]);
    let version = remote.version_at_main();
    assert_eq!(version["major"], 1);
    assert_eq!(version["minor"], 4);
    assert_eq!(version["patch"], 8);
}

#[test]
fn test_concurrent_apply_second_push_is_rejected() {
    let remote = TestRemote::with_version(1, 0, 0);
    let first_dir = remote.clone_as("runner-a");
    let second_dir = remote.clone_as("runner-b");
    let first = Git2Repository::open(&first_dir).unwrap();
    let second = Git2Repository::open(&second_dir).unwrap();
    let config = Config::default();

    let first_report = Applicator::new(&first, &config)
        .apply(&merged_event(&remote, 10, "minor-increment"))
        .unwrap();
    assert_eq!(first_report.current, VersionArtifact::new(1, 1, 0));

    let err = Applicator::new(&second, &config)
        .apply(&merged_event(&remote, 11, "patch-increment"))
        .unwrap_err();
    assert!(err.is_conflict(), "expected a conflict, got: {}", err);

    // The remote holds the first increment only, never 1.1.1 or 1.0.1
    assert_eq!(Some(remote.main_head().to_string()), first_report.commit);
    let version = remote.version_at_main();
    assert_eq!(version["minor"], 1);
    assert_eq!(version["patch"], 0);
}

#[test]
fn test_conflict_also_detected_after_fetch() {
    let remote = TestRemote::with_version(1, 0, 0);
    let first_dir = remote.clone_as("runner-a");
    let second_dir = remote.clone_as("runner-b");
    let first = Git2Repository::open(&first_dir).unwrap();
    let second = Git2Repository::open(&second_dir).unwrap();
    let config = Config {
        fetch: true,
        ..Config::default()
    };

    Applicator::new(&first, &config)
        .apply(&merged_event(&remote, 10, "major-increment"))
        .unwrap();

    // The second runner now knows the new remote head but still builds on
    // the stale merge commit.
    let err = Applicator::new(&second, &config)
        .apply(&merged_event(&remote, 11, "patch-increment"))
        .unwrap_err();
    assert!(err.is_conflict(), "expected a conflict, got: {}", err);
    assert_eq!(remote.version_at_main()["major"], 2);
}

#[test]
fn test_apply_without_label_leaves_remote_untouched() {
    let remote = TestRemote::with_version(0, 3, 1);
    let workdir = remote.clone_as("runner");
    let repo = Git2Repository::open(&workdir).unwrap();
    let config = Config::default();

    let event = merged_event(&remote, 4, "documentation");
    let err = Applicator::new(&repo, &config).apply(&event).unwrap_err();

    assert!(err.to_string().contains("Missing precondition"));
    assert_eq!(remote.main_head(), remote.base);
}

#[test]
fn test_unknown_merge_commit_fails() {
    let remote = TestRemote::with_version(1, 0, 0);
    let workdir = remote.clone_as("runner");
    let repo = Git2Repository::open(&workdir).unwrap();
    let config = Config::default();

    let event = PullRequestEvent::from_json(&pull_request_payload(
        "closed",
        5,
        &["patch-increment"],
        true,
        Some("0123456789012345678901234567890123456789"),
    ))
    .unwrap();

    let err = Applicator::new(&repo, &config).apply(&event).unwrap_err();
    assert!(err.to_string().contains("Cannot resolve commit"));
    assert_eq!(remote.main_head(), remote.base);
}

#[test]
fn test_apply_leaves_head_on_increment_commit() {
    let remote = TestRemote::with_version(1, 0, 0);
    let workdir = remote.clone_as("runner");
    let repo = Git2Repository::open(&workdir).unwrap();
    let config = Config::default();

    let report = Applicator::new(&repo, &config)
        .apply(&merged_event(&remote, 6, "minor-increment"))
        .unwrap();

    let local = Repository::open(&workdir).unwrap();
    let head = local.head().unwrap().target().unwrap();
    assert_eq!(Some(head.to_string()), report.commit);
    assert_eq!(
        local.refname_to_id("refs/heads/main").unwrap().to_string(),
        head.to_string()
    );
    let written = std::fs::read_to_string(workdir.join("version.json")).unwrap();
    assert!(written.contains("\"minor\": 1"));
}

#[test]
fn test_dry_run_keeps_working_tree_and_branch() {
    let remote = TestRemote::with_version(1, 2, 3);
    let workdir = remote.clone_as("runner");
    std::fs::write(workdir.join("README.md"), "uncommitted local edit\n").unwrap();
    let repo = Git2Repository::open(&workdir).unwrap();
    let config = Config::default();

    let report = Applicator::new(&repo, &config)
        .dry_run(true)
        .apply(&merged_event(&remote, 8, "patch-increment"))
        .unwrap();

    assert_eq!(report.previous, VersionArtifact::new(1, 2, 3));
    assert_eq!(report.current, VersionArtifact::new(1, 2, 4));
    assert!(report.commit.is_none());

    let readme = std::fs::read_to_string(workdir.join("README.md")).unwrap();
    assert_eq!(readme, "uncommitted local edit\n");
    let local = Repository::open(&workdir).unwrap();
    assert!(!local.head_detached().unwrap());
    assert_eq!(local.head().unwrap().shorthand(), Some("main"));
    assert_eq!(remote.main_head(), remote.base);
}

#[test]
fn test_rerun_of_applied_merge_is_rejected() {
    let remote = TestRemote::with_version(1, 0, 0);
    let workdir = remote.clone_as("runner");
    let repo = Git2Repository::open(&workdir).unwrap();
    let config = Config::default();
    let event = merged_event(&remote, 12, "patch-increment");

    let first = Applicator::new(&repo, &config).apply(&event).unwrap();

    // Back to back, so the rebuilt commit may be identical to the first one
    let err = Applicator::new(&repo, &config).apply(&event).unwrap_err();
    assert!(err.is_conflict(), "expected a conflict, got: {}", err);

    assert_eq!(Some(remote.main_head().to_string()), first.commit);
    assert_eq!(remote.version_at_main()["patch"], 1);
}
