use async_trait::async_trait;
use std::time::Duration;

use crate::shared::errors::PlatformError;

/// Snapshot of a loaded sound's playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackStatus {
    pub is_loaded: bool,
    pub is_playing: bool,
    pub position: Duration,
    /// `None` while the platform has not determined the length yet (e.g. live streams).
    pub duration: Option<Duration>,
}

/// A loaded sound resource. Owners must call [`Sound::unload`] before dropping it.
#[async_trait]
pub trait Sound: Send + Sync {
    async fn play(&self) -> Result<(), PlatformError>;
    async fn pause(&self) -> Result<(), PlatformError>;
    async fn seek(&self, position: Duration) -> Result<(), PlatformError>;
    async fn status(&self) -> Result<PlaybackStatus, PlatformError>;
    async fn unload(&self) -> Result<(), PlatformError>;
}

/// Platform audio engine.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Load the sound at `uri`. The returned handle is not playing yet.
    async fn load(&self, uri: &str) -> Result<Box<dyn Sound>, PlatformError>;
}
