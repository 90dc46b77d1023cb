//! End-to-end push/pull scenarios over in-memory stores

use super::test_utils::{ts, Harness, RecordingConfirm, SharedConfirm};
use vaultsync::conflict::ConflictPolicy;
use vaultsync::confirm::{AssumeNo, AssumeYes, ConfirmPrompt};
use vaultsync::{SyncOutcome, SyncPhase, SyncSettings};

#[tokio::test]
async fn test_clean_push_makes_zero_remote_writes() {
    let h = Harness::new(AssumeYes);
    h.local.insert_file("a.md", "alpha", ts(10));
    h.local.insert_file("notes/b.md", "beta", ts(10));
    h.remote.insert_file("a.md", "alpha", ts(5));
    h.remote.insert_file("notes/b.md", "beta", ts(5));

    let outcome = h.sync.push(false).await.unwrap();
    assert_eq!(outcome, SyncOutcome::NothingToPush);
    assert_eq!(h.remote.write_count(), 0);
    assert_eq!(h.remote.get_count(), 0);
}

#[tokio::test]
async fn test_new_remote_file_pull_downloads_once() {
    let h = Harness::new(AssumeNo);
    h.local.insert_file("a.md", "alpha", ts(10));
    h.remote.insert_file("a.md", "alpha", ts(20));
    h.remote.insert_file("new.md", "fresh", ts(20));

    let outcome = h.sync.pull(false).await.unwrap();
    let SyncOutcome::Pulled { report } = outcome else {
        panic!("expected pull to apply, got {outcome:?}");
    };
    assert_eq!(report.applied, vec!["new.md"]);
    assert_eq!(h.remote.get_count(), 1);
    assert_eq!(h.local.delete_count(), 0);
    assert_eq!(h.local.write_count(), 1);
    assert_eq!(h.local.content("new.md"), Some(b"fresh".to_vec()));
}

#[tokio::test]
async fn test_push_propagates_deletes_without_uploads() {
    let h = Harness::new(AssumeYes);
    h.local.insert_file("keep.md", "k", ts(10));
    h.remote.insert_file("keep.md", "k", ts(5));
    h.remote.insert_file("old/one.md", "1", ts(5));
    h.remote.insert_file("old/two.md", "2", ts(5));

    let SyncOutcome::Pushed { report } = h.sync.push(false).await.unwrap() else {
        panic!("expected push to apply");
    };
    assert!(report.is_success());
    assert_eq!(h.remote.delete_count(), 2);
    assert_eq!(h.remote.put_count(), 0);
    assert_eq!(h.remote.file_paths(), vec!["keep.md"]);
}

#[tokio::test]
async fn test_empty_push_guard_asks_once_and_declines() {
    let confirm = RecordingConfirm::answering(false);
    let h = Harness::new(SharedConfirm(confirm.clone()));
    h.local.insert_directory("empty-folder", ts(1));
    h.remote.insert_file("precious.md", "p", ts(1));

    let outcome = h.sync.push(false).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Aborted { .. }));
    assert_eq!(*confirm.asked.lock(), vec![ConfirmPrompt::EmptyPush]);
    assert_eq!(h.remote.write_count(), 0);
    assert_eq!(h.sync.phase(), SyncPhase::Aborted);
}

#[tokio::test]
async fn test_empty_push_to_empty_remote_needs_no_prompt() {
    let confirm = RecordingConfirm::answering(false);
    let h = Harness::new(SharedConfirm(confirm.clone()));

    assert_eq!(h.sync.push(false).await.unwrap(), SyncOutcome::NothingToPush);
    assert!(confirm.asked.lock().is_empty());
}

#[tokio::test]
async fn test_conflict_gate_fires_for_newer_local_tree() {
    let confirm = RecordingConfirm::answering(false);
    let h = Harness::new(SharedConfirm(confirm.clone()));
    h.local.insert_file("draft.md", "unsaved work", ts(500));
    h.remote.insert_file("draft.md", "older", ts(100));

    let outcome = h.sync.pull(false).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Aborted { .. }));
    assert_eq!(*confirm.asked.lock(), vec![ConfirmPrompt::PullConflict]);
    assert_eq!(h.local.content("draft.md"), Some(b"unsaved work".to_vec()));
}

#[tokio::test]
async fn test_conflict_gate_accepted_overwrites_local() {
    let h = Harness::new(AssumeYes);
    h.local.insert_file("draft.md", "unsaved work", ts(500));
    h.remote.insert_file("draft.md", "older", ts(100));

    let outcome = h.sync.pull(false).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Pulled { .. }));
    assert_eq!(h.local.content("draft.md"), Some(b"older".to_vec()));
}

#[tokio::test]
async fn test_conflict_gate_quiet_when_remote_is_newer() {
    let confirm = RecordingConfirm::answering(false);
    let h = Harness::new(SharedConfirm(confirm.clone()));
    h.local.insert_file("draft.md", "stale", ts(100));
    h.remote.insert_file("draft.md", "current", ts(500));

    let outcome = h.sync.pull(false).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Pulled { .. }));
    assert!(confirm.asked.lock().is_empty());
}

#[tokio::test]
async fn test_per_file_policy_ignores_newer_untouched_files() {
    let confirm = RecordingConfirm::answering(false);
    let settings = SyncSettings {
        conflict_policy: ConflictPolicy::PerFile,
        ..SyncSettings::default()
    };
    let h = Harness::with_settings(SharedConfirm(confirm.clone()), settings);
    h.local.insert_file("journal.md", "same", ts(900));
    h.local.insert_file("shared.md", "old", ts(100));
    h.remote.insert_file("journal.md", "same", ts(50));
    h.remote.insert_file("shared.md", "new", ts(200));

    let outcome = h.sync.pull(false).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::Pulled { .. }));
    assert!(confirm.asked.lock().is_empty());
    assert_eq!(h.local.content("shared.md"), Some(b"new".to_vec()));
}

#[tokio::test]
async fn test_pull_when_already_in_sync() {
    let h = Harness::new(AssumeYes);
    h.local.insert_file("a.md", "a", ts(1));
    h.remote.insert_file("a.md", "a", ts(1));
    assert_eq!(h.sync.pull(false).await.unwrap(), SyncOutcome::UpToDate);
    assert_eq!(h.local.write_count(), 0);
}

#[tokio::test]
async fn test_pull_removes_local_only_entries() {
    let h = Harness::new(AssumeYes);
    h.local.insert_file("stale/deep/x.md", "x", ts(1));
    h.local.insert_file("a.md", "a", ts(1));
    h.remote.insert_file("a.md", "a", ts(2));

    let SyncOutcome::Pulled { report } = h.sync.pull(false).await.unwrap() else {
        panic!("expected pull to apply");
    };
    assert!(report.is_success());
    assert_eq!(h.local.paths(), vec!["a.md"]);
}

#[tokio::test]
async fn test_push_then_pull_elsewhere_converges() {
    let first = Harness::new(AssumeYes);
    first.local.insert_file("a.md", "a", ts(1));
    first.local.insert_file("img/p.png", vec![137u8, 80, 78, 71], ts(1));
    first.sync.push(false).await.unwrap();

    let second = vaultsync::SyncOrchestrator::new(
        std::sync::Arc::new(vaultsync::store::MemoryLocalStore::new()),
        first.remote.clone(),
        std::sync::Arc::new(AssumeYes),
        SyncSettings::default(),
    );
    assert!(matches!(
        second.pull(false).await.unwrap(),
        SyncOutcome::Pulled { .. }
    ));
    assert_eq!(second.pull(false).await.unwrap(), SyncOutcome::UpToDate);
    assert_eq!(first.sync.push(false).await.unwrap(), SyncOutcome::NothingToPush);
}

#[tokio::test]
async fn test_confirmed_empty_push_deletes_everything() {
    let confirm = RecordingConfirm::answering(true);
    let h = Harness::new(SharedConfirm(confirm.clone()));
    h.remote.insert_file("a.md", "a", ts(5));
    h.remote.insert_file("b.md", "b", ts(5));

    let SyncOutcome::Pushed { report } = h.sync.push(false).await.unwrap() else {
        panic!("expected push to apply");
    };
    assert_eq!(report.applied, vec!["a.md", "b.md"]);
    assert_eq!(*confirm.asked.lock(), vec![ConfirmPrompt::EmptyPush]);
    assert_eq!(h.remote.delete_count(), 2);
    assert_eq!(h.remote.put_count(), 0);
    assert!(h.remote.file_paths().is_empty());
}

#[tokio::test]
async fn test_touch_without_edit_is_not_a_change() {
    let h = Harness::new(AssumeYes);
    h.local.insert_file("note.md", "body", ts(10));
    h.sync.push(false).await.unwrap();
    let puts = h.remote.put_count();

    h.local.insert_file("note.md", "body", ts(9_999));
    assert_eq!(h.sync.push(false).await.unwrap(), SyncOutcome::NothingToPush);
    assert_eq!(h.remote.put_count(), puts);
}

#[tokio::test]
async fn test_hidden_remote_files_are_left_alone() {
    let h = Harness::new(AssumeYes);
    h.local.insert_file("a.md", "a", ts(1));
    h.remote.insert_file("a.md", "a", ts(5));
    h.remote.insert_file(".gitignore", "*.tmp", ts(5));
    h.remote.insert_file(".github/workflows/ci.yml", "on: push", ts(5));

    assert_eq!(h.sync.pull(false).await.unwrap(), SyncOutcome::UpToDate);
    assert_eq!(h.sync.pull(false).await.unwrap(), SyncOutcome::UpToDate);
    assert!(h.local.content(".gitignore").is_none());

    assert_eq!(h.sync.push(false).await.unwrap(), SyncOutcome::NothingToPush);
    assert_eq!(h.remote.write_count(), 0);
    assert_eq!(h.remote.content(".gitignore"), Some(b"*.tmp".to_vec()));
}

#[tokio::test]
async fn test_ignored_remote_directory_survives_push() {
    let settings = SyncSettings {
        ignore_patterns: vec!["build".to_string()],
        ..SyncSettings::default()
    };
    let h = Harness::with_settings(AssumeYes, settings);
    h.local.insert_file("a.md", "new", ts(10));
    h.remote.insert_file("a.md", "old", ts(5));
    h.remote.insert_file("build/out.html", "<p>", ts(5));

    let SyncOutcome::Pushed { report } = h.sync.push(false).await.unwrap() else {
        panic!("expected push to apply");
    };
    assert_eq!(report.applied, vec!["a.md"]);
    assert_eq!(h.remote.delete_count(), 0);
    assert!(h.remote.content("build/out.html").is_some());
}
