use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::KeyValueStorage;
use crate::shared::errors::StorageError;
use crate::shared::paths::get_data_dir;

/// File-backed storage: each key maps to `{dir}/{key}.json`.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under the user's data directory (`$XDG_DATA_HOME/nexs/data`).
    pub fn at_default_location() -> Self {
        Self::new(get_data_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem_for_key(key)))
    }
}

/// Map a storage key to a safe filename stem.
/// Keys such as `@tasks` keep their letters; anything outside `[A-Za-z0-9_-]` becomes `_`.
fn file_stem_for_key(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "unnamed".to_string()
    } else {
        stem
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::directory(e.to_string()))?;

        // Write to a sibling temp file and rename so readers never see a partial blob
        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::trace!(
            target: "storage",
            path = %path.display(),
            bytes = value.len(),
            "Wrote storage key"
        );
        Ok(())
    }
}
