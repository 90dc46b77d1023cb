//! Single-flight guard around push and pull

use super::test_utils::ts;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use vaultsync::confirm::AssumeYes;
use vaultsync::remote::MemoryRemoteStore;
use vaultsync::store::{LocalItem, LocalStore, MemoryLocalStore};
use vaultsync::{StoreError, SyncError, SyncOrchestrator, SyncOutcome, SyncSettings};

/// Memory store whose listing takes a while
struct SlowLocal {
    inner: MemoryLocalStore,
    delay: Duration,
}

#[async_trait]
impl LocalStore for SlowLocal {
    async fn list_all(&self) -> Result<Vec<LocalItem>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.list_all().await
    }

    async fn read_text(&self, path: &str) -> Result<String, StoreError> {
        self.inner.read_text(path).await
    }

    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.inner.read_bytes(path).await
    }

    async fn write_text(&self, path: &str, content: &str) -> Result<(), StoreError> {
        self.inner.write_text(path, content).await
    }

    async fn write_bytes(&self, path: &str, content: &[u8]) -> Result<(), StoreError> {
        self.inner.write_bytes(path, content).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.inner.delete(path).await
    }

    async fn create_directory(&self, path: &str) -> Result<(), StoreError> {
        self.inner.create_directory(path).await
    }

    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        self.inner.exists(path).await
    }
}

fn slow_orchestrator() -> (Arc<MemoryRemoteStore>, SyncOrchestrator) {
    let inner = MemoryLocalStore::new();
    inner.insert_file("a.md", "a", ts(10));
    let local = SlowLocal {
        inner,
        delay: Duration::from_secs(5),
    };
    let remote = Arc::new(MemoryRemoteStore::new("vault"));
    let sync = SyncOrchestrator::new(
        Arc::new(local),
        remote.clone(),
        Arc::new(AssumeYes),
        SyncSettings::default(),
    );
    (remote, sync)
}

#[tokio::test(start_paused = true)]
async fn test_second_push_is_rejected_while_first_runs() {
    let (remote, sync) = slow_orchestrator();

    let (first, second) = tokio::join!(sync.push(false), sync.push(false));

    assert!(matches!(first, Ok(SyncOutcome::Pushed { .. })));
    assert!(matches!(second, Err(SyncError::Busy)));
    assert_eq!(remote.put_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pull_is_rejected_while_push_runs() {
    let (_remote, sync) = slow_orchestrator();

    let (push, pull) = tokio::join!(sync.push(false), sync.pull(false));

    assert!(push.is_ok());
    assert!(matches!(pull, Err(SyncError::Busy)));
}

#[tokio::test(start_paused = true)]
async fn test_guard_is_released_after_a_run() {
    let (_remote, sync) = slow_orchestrator();

    sync.push(false).await.unwrap();
    assert_eq!(sync.push(false).await.unwrap(), SyncOutcome::NothingToPush);
}
