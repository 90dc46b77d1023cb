//! Filesystem vault -> remote -> filesystem vault

use super::test_utils::ts;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use vaultsync::confirm::AssumeYes;
use vaultsync::remote::MemoryRemoteStore;
use vaultsync::store::FsLocalStore;
use vaultsync::tree::hasher;
use vaultsync::{SyncOrchestrator, SyncOutcome, SyncSettings};

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn orchestrator(root: &Path, remote: &Arc<MemoryRemoteStore>) -> SyncOrchestrator {
    let local = FsLocalStore::open(root).unwrap();
    SyncOrchestrator::new(
        Arc::new(local),
        remote.clone(),
        Arc::new(AssumeYes),
        SyncSettings::default(),
    )
}

fn seed_vault(root: &Path) {
    fs::create_dir_all(root.join("daily/2024")).unwrap();
    fs::create_dir_all(root.join("attachments")).unwrap();
    fs::create_dir_all(root.join(".obsidian")).unwrap();
    fs::write(root.join("index.md"), "# Index\n").unwrap();
    fs::write(root.join("daily/2024/01-01.md"), "new year\n").unwrap();
    fs::write(root.join("attachments/logo.png"), PNG_HEADER).unwrap();
    fs::write(root.join("blank.md"), "").unwrap();
    fs::write(root.join(".obsidian/workspace.json"), "{}").unwrap();
}

#[tokio::test]
async fn test_vault_round_trip_through_remote() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    seed_vault(a.path());
    let remote = Arc::new(MemoryRemoteStore::new("notes"));
    remote.set_clock(ts(1_000));

    let first = orchestrator(a.path(), &remote);
    let SyncOutcome::Pushed { report } = first.push(false).await.unwrap() else {
        panic!("expected push to apply");
    };
    assert!(report.is_success());

    // Hidden paths stay local
    let mut pushed = remote.file_paths();
    pushed.sort();
    assert_eq!(
        pushed,
        vec![
            "attachments/logo.png",
            "blank.md",
            "daily/2024/01-01.md",
            "index.md",
        ]
    );
    assert_eq!(remote.content("blank.md"), Some(b"\n".to_vec()));
    assert_eq!(
        remote.object_id("attachments/logo.png"),
        Some(hasher::hash_bytes(&PNG_HEADER))
    );

    let second = orchestrator(b.path(), &remote);
    assert!(matches!(
        second.pull(false).await.unwrap(),
        SyncOutcome::Pulled { .. }
    ));
    assert_eq!(
        fs::read(b.path().join("attachments/logo.png")).unwrap(),
        PNG_HEADER
    );
    assert_eq!(
        fs::read_to_string(b.path().join("daily/2024/01-01.md")).unwrap(),
        "new year\n"
    );
    assert_eq!(fs::read_to_string(b.path().join("blank.md")).unwrap(), "\n");
    assert!(!b.path().join(".obsidian").exists());

    assert_eq!(second.pull(false).await.unwrap(), SyncOutcome::UpToDate);
}

#[tokio::test]
async fn test_edits_flow_back_to_origin() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    seed_vault(a.path());
    let remote = Arc::new(MemoryRemoteStore::new("notes"));

    orchestrator(a.path(), &remote).push(false).await.unwrap();
    let second = orchestrator(b.path(), &remote);
    second.pull(false).await.unwrap();

    fs::write(b.path().join("index.md"), "# Index\n\nedited elsewhere\n").unwrap();
    fs::remove_dir_all(b.path().join("daily")).unwrap();
    let SyncOutcome::Pushed { report } = second.push(false).await.unwrap() else {
        panic!("expected push to apply");
    };
    assert!(report.applied.contains(&"index.md".to_string()));
    assert!(report.applied.contains(&"daily/2024/01-01.md".to_string()));
    assert!(remote.content("daily/2024/01-01.md").is_none());

    let first = orchestrator(a.path(), &remote);
    assert!(matches!(
        first.pull(false).await.unwrap(),
        SyncOutcome::Pulled { .. }
    ));
    assert_eq!(
        fs::read_to_string(a.path().join("index.md")).unwrap(),
        "# Index\n\nedited elsewhere\n"
    );
    assert!(!a.path().join("daily").exists());
    assert!(a.path().join(".obsidian/workspace.json").exists());
}

#[tokio::test]
async fn test_blank_file_is_rewritten_once() {
    let a = TempDir::new().unwrap();
    fs::write(a.path().join("blank.md"), "").unwrap();
    let remote = Arc::new(MemoryRemoteStore::new("notes"));
    let sync = orchestrator(a.path(), &remote);

    sync.push(false).await.unwrap();
    assert_eq!(remote.put_count(), 1);
    assert_eq!(fs::read_to_string(a.path().join("blank.md")).unwrap(), "\n");

    assert_eq!(sync.push(false).await.unwrap(), SyncOutcome::NothingToPush);
    assert_eq!(remote.put_count(), 1);
}

#[tokio::test]
async fn test_pull_keeps_directory_holding_hidden_files() {
    let a = TempDir::new().unwrap();
    fs::create_dir_all(a.path().join("drafts")).unwrap();
    fs::write(a.path().join("drafts/.private.md"), "mine").unwrap();
    fs::write(a.path().join("drafts/stale.md"), "gone upstream").unwrap();
    fs::write(a.path().join("a.md"), "a").unwrap();
    let remote = Arc::new(MemoryRemoteStore::new("notes"));
    remote.insert_file("a.md", "a", chrono::Utc::now() + chrono::Duration::days(1));

    let sync = orchestrator(a.path(), &remote);
    let SyncOutcome::Pulled { report } = sync.pull(false).await.unwrap() else {
        panic!("expected pull to apply");
    };
    assert!(report.is_success());
    assert_eq!(report.applied, vec!["drafts/stale.md"]);
    assert_eq!(
        fs::read_to_string(a.path().join("drafts/.private.md")).unwrap(),
        "mine"
    );
    assert!(!a.path().join("drafts/stale.md").exists());

    assert_eq!(sync.pull(false).await.unwrap(), SyncOutcome::UpToDate);
}
