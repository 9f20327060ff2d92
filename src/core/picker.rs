use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::shared::errors::PlatformError;

/// A file chosen by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub uri: String,
    pub name: Option<String>,
    /// Anything else the platform reports (size, mimeType, ...), kept verbatim.
    pub metadata: Map<String, Value>,
}

impl PickedFile {
    pub fn new(uri: impl Into<String>, name: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            name,
            metadata: Map::new(),
        }
    }
}

/// Platform document picker.
#[async_trait]
pub trait DocumentPicker: Send + Sync {
    /// Let the user choose one audio file. `Ok(None)` means the user cancelled.
    async fn pick_audio(&self) -> Result<Option<PickedFile>, PlatformError>;
}
