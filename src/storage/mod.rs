pub mod file;
pub mod memory;
pub mod persist;
pub mod queue;
pub mod snapshot;

use async_trait::async_trait;

use crate::shared::errors::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use persist::Persisted;
pub use queue::WriteQueue;
pub use snapshot::SnapshotStore;

/// Storage key for the dated task collection.
pub const TASKS_KEY: &str = "@tasks";
/// Storage key for the to-do list.
pub const TODOS_KEY: &str = "tasks";
/// Storage key for the playlist mapping.
pub const PLAYLISTS_KEY: &str = "playlists";

/// Asynchronous key-value storage holding one text blob per key.
///
/// Hosts back this with their platform store; the crate ships a file-backed
/// and an in-memory implementation.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
