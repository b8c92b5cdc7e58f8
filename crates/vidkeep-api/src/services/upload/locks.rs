//! Per-video in-flight upload locks.
//!
//! Two concurrent uploads for the same video id would race on the staged file
//! and on the object key. The object store's overwrite semantics make that
//! race safe (last transfer wins), but serializing the requests removes it
//! entirely at negligible cost.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct UploadLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl UploadLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the upload lock for a video id, waiting if another upload for
    /// the same id is in flight. The returned guard releases the lock on drop.
    pub async fn acquire(&self, video_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            // A held lock is kept alive by its guard, so idle entries are the
            // ones only the map still references.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(video_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked_ids(&self) -> usize {
        self.inner.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_id_uploads_are_serialized() {
        let locks = UploadLocks::new();
        let video_id = Uuid::new_v4();

        let guard = locks.acquire(video_id).await;

        let locks_clone = locks.clone();
        let contender = tokio::spawn(async move { locks_clone.acquire(video_id).await });

        // The contender cannot make progress while the first guard is held.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.expect("contender completes");
    }

    #[tokio::test]
    async fn different_ids_do_not_block_each_other() {
        let locks = UploadLocks::new();
        let _a = locks.acquire(Uuid::new_v4()).await;
        let _b = locks.acquire(Uuid::new_v4()).await;
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = UploadLocks::new();
        let first = Uuid::new_v4();

        drop(locks.acquire(first).await);
        // The next acquire sweeps entries nobody holds anymore.
        let _guard = locks.acquire(Uuid::new_v4()).await;
        assert_eq!(locks.tracked_ids().await, 1);
    }
}
