//! Playback of one sound at a time.
//!
//! The player owns at most one loaded [`Sound`]. Loading a new track always
//! unloads the previous one first, and every unload path (track switch,
//! stop, failed start, teardown, drop) also stops the position poller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::audio::{AudioEngine, Sound};
use crate::shared::errors::PlatformError;

/// Position and length of the loaded sound, refreshed by the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub position: Duration,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerState {
    pub loaded_uri: Option<String>,
    pub is_playing: bool,
    pub progress: Progress,
}

/// Silences and aborts the poll task when dropped.
///
/// `abort` alone does not stop a poll already running on another worker, so
/// the task also checks `live` inside the progress update, under the channel lock.
struct PollGuard {
    live: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        self.task.abort();
    }
}

struct ActiveSound {
    uri: String,
    sound: Arc<dyn Sound>,
    _poller: PollGuard,
}

pub struct Player {
    engine: Arc<dyn AudioEngine>,
    poll_interval: Duration,
    active: Option<ActiveSound>,
    is_playing: bool,
    progress: Arc<watch::Sender<Progress>>,
}

impl Player {
    pub fn new(engine: Arc<dyn AudioEngine>, poll_interval: Duration) -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            engine,
            poll_interval,
            active: None,
            is_playing: false,
            progress: Arc::new(progress),
        }
    }

    pub fn state(&self) -> PlayerState {
        PlayerState {
            loaded_uri: self.active.as_ref().map(|active| active.uri.clone()),
            is_playing: self.is_playing,
            progress: *self.progress.borrow(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Receive progress updates while a sound is loaded.
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// Unload whatever is playing, then load and start `uri`.
    pub async fn play_uri(&mut self, uri: &str) -> Result<(), PlatformError> {
        self.unload().await;

        let sound: Arc<dyn Sound> = Arc::from(self.engine.load(uri).await?);

        if let Err(e) = sound.play().await {
            if let Err(unload_err) = sound.unload().await {
                tracing::warn!(target: "music", uri, "Failed to unload after play error: {}", unload_err);
            }
            return Err(e);
        }

        let duration = match sound.status().await {
            Ok(status) => status.duration.unwrap_or_default(),
            Err(e) => {
                tracing::debug!(target: "music", uri, "Could not read duration: {}", e);
                Duration::ZERO
            }
        };
        self.progress.send_replace(Progress {
            position: Duration::ZERO,
            duration,
        });

        let poller = spawn_poller(Arc::clone(&sound), Arc::clone(&self.progress), self.poll_interval);
        self.active = Some(ActiveSound {
            uri: uri.to_string(),
            sound,
            _poller: poller,
        });
        self.is_playing = true;

        tracing::info!(target: "music", uri, duration_ms = duration.as_millis() as u64, "Playback started");
        Ok(())
    }

    /// Pause if playing, resume if paused. Returns whether audio is now playing.
    pub async fn toggle_play_pause(&mut self) -> Result<bool, PlatformError> {
        let Some(active) = &self.active else {
            return Ok(false);
        };

        let playing = match active.sound.status().await {
            Ok(status) => status.is_playing,
            Err(_) => self.is_playing,
        };

        if playing {
            active.sound.pause().await?;
            self.is_playing = false;
        } else {
            active.sound.play().await?;
            self.is_playing = true;
        }
        Ok(self.is_playing)
    }

    pub async fn seek(&mut self, position: Duration) -> Result<(), PlatformError> {
        let Some(active) = &self.active else {
            return Ok(());
        };

        active.sound.seek(position).await?;
        self.progress.send_modify(|progress| progress.position = position);
        Ok(())
    }

    /// Release the loaded sound, stop polling and reset playback state.
    pub async fn unload(&mut self) {
        self.is_playing = false;

        let Some(active) = self.active.take() else {
            self.progress.send_replace(Progress::default());
            return;
        };

        // Silence the poller before resetting so no stale position lands afterwards
        let ActiveSound { uri, sound, _poller } = active;
        drop(_poller);
        self.progress.send_replace(Progress::default());

        match sound.unload().await {
            Ok(()) => tracing::debug!(target: "music", uri = %uri, "Sound unloaded"),
            Err(e) => tracing::warn!(target: "music", uri = %uri, "Failed to unload sound: {}", e),
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        // Silence the poller first; the async unload needs a runtime
        let ActiveSound { uri, sound, _poller } = active;
        drop(_poller);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = sound.unload().await {
                        tracing::warn!(target: "music", uri = %uri, "Failed to unload sound on drop: {}", e);
                    }
                });
            }
            Err(_) => {
                tracing::warn!(target: "music", uri = %uri, "Player dropped outside a runtime, sound not unloaded");
            }
        }
    }
}

fn spawn_poller(
    sound: Arc<dyn Sound>,
    progress: Arc<watch::Sender<Progress>>,
    every: Duration,
) -> PollGuard {
    let live = Arc::new(AtomicBool::new(true));
    let task_live = Arc::clone(&live);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match sound.status().await {
                Ok(status) if status.is_loaded => {
                    publish_progress(&progress, &task_live, status.position, status.duration);
                }
                Ok(_) => {}
                Err(e) => tracing::trace!(target: "music", "Position poll failed: {}", e),
            }
        }
    });

    PollGuard { live, task }
}

/// Store a polled position unless the poller has been silenced. Returns whether it was stored.
fn publish_progress(
    progress: &watch::Sender<Progress>,
    live: &AtomicBool,
    position: Duration,
    duration: Option<Duration>,
) -> bool {
    progress.send_if_modified(|current| {
        if !live.load(Ordering::SeqCst) {
            return false;
        }
        current.position = position;
        if let Some(duration) = duration {
            current.duration = duration;
        }
        true
    })
}

/// Format a playback position as `m:ss`.
pub fn format_time(position: Duration) -> String {
    let total_secs = position.as_secs();
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
