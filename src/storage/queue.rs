//! Single-writer persistence queue.
//!
//! Each persisted collection owns one queue. At most one write is in flight;
//! snapshots submitted while a write is running collapse into "latest
//! snapshot", which is written once the current write completes. Writes land
//! in submission order, so the stored blob always converges to the newest
//! snapshot and an older write can never overwrite a newer one.

use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::KeyValueStorage;

#[derive(Clone, Default)]
struct Pending {
    version: u64,
    payload: Option<Arc<str>>,
}

/// Result of the write that covered a submitted version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    /// Version actually written (may be newer than the one waited on).
    pub version: u64,
    pub ok: bool,
}

pub struct WriteQueue {
    key: String,
    next_version: Mutex<u64>,
    pending_tx: watch::Sender<Pending>,
    completed_rx: watch::Receiver<WriteOutcome>,
    worker: JoinHandle<()>,
}

impl WriteQueue {
    /// Spawn the writer task for `key`. Must be called from within a tokio runtime.
    pub fn spawn(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (pending_tx, pending_rx) = watch::channel(Pending::default());
        let (completed_tx, completed_rx) = watch::channel(WriteOutcome {
            version: 0,
            ok: true,
        });

        let worker = tokio::spawn(writer_loop(
            storage,
            key.clone(),
            pending_rx,
            completed_tx,
        ));

        Self {
            key,
            next_version: Mutex::new(0),
            pending_tx,
            completed_rx,
            worker,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Queue `payload` as the latest snapshot and return its version.
    /// Does not wait for the write.
    pub fn submit(&self, payload: impl Into<Arc<str>>) -> u64 {
        // Version assignment and publication happen under one lock so the
        // channel never holds an older version than one already handed out.
        let mut next = match self.next_version.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *next += 1;
        let version = *next;
        self.pending_tx.send_replace(Pending {
            version,
            payload: Some(payload.into()),
        });
        version
    }

    /// Wait until `version` (or a newer snapshot) has been written.
    pub async fn flush(&self, version: u64) -> WriteOutcome {
        let mut completed = self.completed_rx.clone();
        let outcome = match completed.wait_for(|done| done.version >= version).await {
            Ok(done) => *done,
            Err(_) => {
                tracing::error!(
                    target: "storage",
                    key = %self.key,
                    version,
                    "Writer task stopped before flushing"
                );
                WriteOutcome { version, ok: false }
            }
        };
        outcome
    }

    /// Submit and wait for the write.
    pub async fn persist(&self, payload: impl Into<Arc<str>>) -> WriteOutcome {
        let version = self.submit(payload);
        self.flush(version).await
    }

    /// Most recent completed write.
    pub fn last_outcome(&self) -> WriteOutcome {
        *self.completed_rx.borrow()
    }

    /// Stop accepting snapshots, let the writer drain the latest one, and wait for it to exit.
    pub async fn close(self) {
        let WriteQueue {
            key,
            pending_tx,
            worker,
            ..
        } = self;
        drop(pending_tx);
        if let Err(e) = worker.await {
            tracing::error!(target: "storage", key = %key, "Writer task failed: {}", e);
        }
    }
}

async fn writer_loop(
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    mut pending_rx: watch::Receiver<Pending>,
    completed_tx: watch::Sender<WriteOutcome>,
) {
    let mut last_written = 0u64;

    // changed() still yields a value published right before the sender was dropped
    while pending_rx.changed().await.is_ok() {
        let pending = pending_rx.borrow_and_update().clone();
        let Some(payload) = pending.payload else {
            continue;
        };

        let coalesced = pending.version.saturating_sub(last_written + 1);
        if coalesced > 0 {
            tracing::debug!(
                target: "storage",
                key = %key,
                version = pending.version,
                coalesced,
                "Coalesced superseded snapshots"
            );
        }

        let ok = match storage.set(&key, &payload).await {
            Ok(()) => {
                tracing::debug!(
                    target: "storage",
                    key = %key,
                    version = pending.version,
                    bytes = payload.len(),
                    "Persisted snapshot"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    target: "storage",
                    key = %key,
                    version = pending.version,
                    "Failed to persist snapshot: {}",
                    e
                );
                false
            }
        };

        last_written = pending.version;
        completed_tx.send_replace(WriteOutcome {
            version: pending.version,
            ok,
        });
    }

    tracing::trace!(target: "storage", key = %key, "Writer task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::StorageError;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Storage that records every write and blocks each one until released.
    struct GatedStorage {
        writes: Mutex<Vec<String>>,
        gate: tokio::sync::Semaphore,
    }

    #[async_trait]
    impl KeyValueStorage for GatedStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, value: &str) -> Result<(), StorageError> {
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| StorageError::unavailable(e.to_string()))?;
            permit.forget();
            self.writes.lock().unwrap().push(value.to_string());
            Ok(())
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl KeyValueStorage for FailingStorage {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::unavailable("disk full"))
        }
    }

    #[tokio::test]
    async fn test_persist_writes_payload() {
        let storage = Arc::new(MemoryStorage::new());
        let queue = WriteQueue::spawn(storage.clone(), "tasks");

        let outcome = queue.persist("[1,2]").await;
        assert!(outcome.ok);
        assert_eq!(outcome.version, 1);
        assert_eq!(storage.raw("tasks").as_deref(), Some("[1,2]"));
    }

    #[tokio::test]
    async fn test_snapshots_coalesce_while_write_in_flight() {
        let storage = Arc::new(GatedStorage {
            writes: Mutex::new(Vec::new()),
            gate: tokio::sync::Semaphore::new(0),
        });
        let queue = WriteQueue::spawn(storage.clone(), "tasks");

        queue.submit("first");
        // Let the writer pick up "first" and block inside set()
        tokio::time::sleep(Duration::from_millis(20)).await;

        queue.submit("second");
        queue.submit("third");
        let last = queue.submit("fourth");

        storage.gate.add_permits(10);
        let outcome = queue.flush(last).await;

        assert!(outcome.ok);
        assert_eq!(outcome.version, last);
        let writes = storage.writes.lock().unwrap().clone();
        assert_eq!(writes, vec!["first".to_string(), "fourth".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_is_reported_not_raised() {
        let queue = WriteQueue::spawn(Arc::new(FailingStorage), "tasks");
        let outcome = queue.persist("[]").await;
        assert!(!outcome.ok);
        assert_eq!(queue.last_outcome(), outcome);
    }

    #[tokio::test]
    async fn test_close_drains_latest_snapshot() {
        let storage = Arc::new(MemoryStorage::new());
        let queue = WriteQueue::spawn(storage.clone(), "playlists");

        queue.submit("{}");
        queue.submit(r#"{"Mix":[]}"#);
        queue.close().await;

        assert_eq!(storage.raw("playlists").as_deref(), Some(r#"{"Mix":[]}"#));
    }
}
