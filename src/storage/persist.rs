use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use super::queue::{WriteOutcome, WriteQueue};
use super::KeyValueStorage;

/// Mirrors one collection to one storage key as JSON.
///
/// Loading never fails: a missing key, unreadable storage or corrupt blob all
/// yield the empty collection so the screen stays renderable. Saving goes
/// through a [`WriteQueue`]; failures are logged and never surface to the caller.
pub struct Persisted<C> {
    key: &'static str,
    storage: Arc<dyn KeyValueStorage>,
    queue: WriteQueue,
    _collection: PhantomData<fn() -> C>,
}

impl<C> Persisted<C>
where
    C: Serialize + DeserializeOwned + Default,
{
    /// Must be called from within a tokio runtime (spawns the writer task).
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: &'static str) -> Self {
        let queue = WriteQueue::spawn(Arc::clone(&storage), key);
        Self {
            key,
            storage,
            queue,
            _collection: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub async fn load(&self) -> C {
        let raw = match self.storage.get(self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(target: "storage", key = self.key, "No stored data, starting empty");
                return C::default();
            }
            Err(e) => {
                tracing::warn!(target: "storage", key = self.key, "Failed to read stored data: {}", e);
                return C::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(collection) => collection,
            Err(e) => {
                tracing::warn!(
                    target: "storage",
                    key = self.key,
                    bytes = raw.len(),
                    "Stored data is corrupt, starting empty: {}",
                    e
                );
                C::default()
            }
        }
    }

    /// Serialize and write `collection`, waiting for the write (or a newer one) to land.
    pub async fn save(&self, collection: &C) -> WriteOutcome {
        match serde_json::to_string(collection) {
            Ok(json) => self.queue.persist(json).await,
            Err(e) => {
                tracing::error!(target: "storage", key = self.key, "Failed to serialize collection: {}", e);
                self.queue.last_outcome()
            }
        }
    }

    /// Flush and stop the writer.
    pub async fn close(self) {
        self.queue.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_load_missing_key_is_empty() {
        let persisted: Persisted<Vec<String>> = Persisted::new(Arc::new(MemoryStorage::new()), "tasks");
        assert!(persisted.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_data_is_empty() {
        let storage = Arc::new(MemoryStorage::new().with_entry("tasks", "{not json"));
        let persisted: Persisted<Vec<String>> = Persisted::new(storage, "tasks");
        assert!(persisted.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_empty() {
        let storage = Arc::new(MemoryStorage::new().with_entry("tasks", r#"{"a":1}"#));
        let persisted: Persisted<Vec<String>> = Persisted::new(storage, "tasks");
        assert!(persisted.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let storage = Arc::new(MemoryStorage::new());
        let persisted: Persisted<BTreeMap<String, Vec<u32>>> = Persisted::new(storage, "playlists");

        let mut value = BTreeMap::new();
        value.insert("Morning".to_string(), vec![3, 1, 2]);

        assert!(persisted.save(&value).await.ok);
        assert_eq!(persisted.load().await, value);
    }
}
