//! Debounced view persistence.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::store::LocalStore;

/// A snapshot waiting for its debounce window to elapse.
struct PendingWrite {
    payload: String,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// Writes a table's view to its store key, at most once per quiet period.
///
/// Each [`schedule`](Self::schedule) cancels the previous pending write
/// and starts a new timer, so a burst of changes results in a single write
/// of the last snapshot. Dropping the writer discards whatever is pending.
pub(crate) struct ViewWriter {
    store: Arc<dyn LocalStore>,
    key: String,
    delay: Duration,
    pending: Option<PendingWrite>,
}

impl ViewWriter {
    pub(crate) fn new(store: Arc<dyn LocalStore>, key: String, delay: Duration) -> Self {
        Self {
            store,
            key,
            delay,
            pending: None,
        }
    }

    /// Supersede any pending write with `payload`.
    ///
    /// Outside a tokio runtime no timer can be started; the snapshot is
    /// kept and written by the next [`flush`](Self::flush).
    pub(crate) fn schedule(&mut self, payload: String) {
        self.discard();

        let cancel = CancellationToken::new();
        let task = match Handle::try_current() {
            Ok(handle) => Some(handle.spawn(write_after(
                Arc::clone(&self.store),
                self.key.clone(),
                payload.clone(),
                self.delay,
                cancel.clone(),
            ))),
            Err(_) => {
                debug!("no runtime for debounced write of '{}', deferring to flush", self.key);
                None
            }
        };

        self.pending = Some(PendingWrite {
            payload,
            cancel,
            task,
        });
    }

    /// Returns `true` if a snapshot has not been written yet.
    pub(crate) fn has_pending(&self) -> bool {
        match &self.pending {
            Some(PendingWrite {
                task: Some(task), ..
            }) => !task.is_finished(),
            Some(PendingWrite { task: None, .. }) => true,
            None => false,
        }
    }

    /// Write the pending snapshot now instead of waiting for the timer.
    pub(crate) async fn flush(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        pending.cancel.cancel();
        if let Some(task) = pending.task {
            if task.is_finished() {
                return;
            }
            // Let a write that already passed its timer land first
            let _ = task.await;
        }
        write(self.store.as_ref(), &self.key, &pending.payload).await;
    }

    /// Drop the pending snapshot without writing it.
    pub(crate) fn discard(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
        }
    }

    /// Discard anything pending and delete the stored entry.
    pub(crate) async fn clear(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
            if let Some(task) = pending.task {
                let _ = task.await;
            }
        }
        if let Err(e) = self.store.remove(&self.key).await {
            warn!("failed to delete saved view '{}': {}", self.key, e);
        }
    }
}

impl Drop for ViewWriter {
    fn drop(&mut self) {
        self.discard();
    }
}

async fn write_after(
    store: Arc<dyn LocalStore>,
    key: String,
    payload: String,
    delay: Duration,
    cancel: CancellationToken,
) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = tokio::time::sleep(delay) => {
            write(store.as_ref(), &key, &payload).await;
        }
    }
}

async fn write(store: &dyn LocalStore, key: &str, payload: &str) {
    match store.set(key, payload).await {
        Ok(()) => debug!("saved view '{}'", key),
        Err(e) => warn!("failed to save view '{}': {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn writer(store: &Arc<MemoryStore>) -> ViewWriter {
        ViewWriter::new(
            Arc::clone(store) as Arc<dyn LocalStore>,
            "k".to_string(),
            Duration::from_millis(250),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_writes_last_snapshot_once() {
        let store = Arc::new(MemoryStore::new());
        let mut writer = writer(&store);

        writer.schedule("1".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        writer.schedule("2".to_string());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.get("k").await.unwrap(), None);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("2"));
        assert!(!writer.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately() {
        let store = Arc::new(MemoryStore::new());
        let mut writer = writer(&store);

        writer.schedule("now".to_string());
        assert!(writer.has_pending());
        writer.flush().await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("now"));
        assert!(!writer.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_write() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut writer = writer(&store);
            writer.schedule("late".to_string());
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_and_deletes() {
        let store = Arc::new(MemoryStore::new());
        store.set("k", "old").await.unwrap();
        let mut writer = writer(&store);

        writer.schedule("new".to_string());
        writer.clear().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[test]
    fn test_without_runtime_flush_still_writes() {
        let store = Arc::new(MemoryStore::new());
        let mut writer = writer(&store);
        writer.schedule("offline".to_string());
        assert!(writer.has_pending());

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            writer.flush().await;
            assert_eq!(store.get("k").await.unwrap().as_deref(), Some("offline"));
        });
    }
}
