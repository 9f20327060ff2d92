pub mod demo;
pub mod player;
pub mod store;
pub mod types;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::core::audio::AudioEngine;
use crate::core::picker::DocumentPicker;
use crate::core::platform::{reject, ConfirmRequest, Platform, Prompt};
use crate::core::settings::AppSettings;
use crate::shared::errors::{PlatformError, ValidationError};
use crate::storage::{Persisted, SnapshotStore, PLAYLISTS_KEY};
use player::{Player, PlayerState, Progress};
use types::{Playlists, Track};

#[derive(Error, Debug)]
pub enum MusicError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),
    #[error("No playlist selected")]
    NoActivePlaylist,
    #[error("Track index out of range: {0}")]
    TrackNotFound(usize),
}

/// Which playlist is active and which of its tracks is current.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub active: Option<String>,
    pub index: usize,
}

/// Snapshot of everything the music screen renders besides the playlists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicState {
    pub selection: Selection,
    pub player: PlayerState,
}

/// Playlist management plus playback of the active playlist.
///
/// Mutating operations hold the player lock for their whole duration, so
/// they run one at a time. The selection lock is only taken briefly inside
/// it and never across an await.
pub struct MusicScreen {
    store: SnapshotStore<Playlists>,
    persisted: Persisted<Playlists>,
    selection: Mutex<Selection>,
    player: tokio::sync::Mutex<Player>,
    progress: watch::Receiver<Progress>,
    picker: Arc<dyn DocumentPicker>,
    prompt: Arc<dyn Prompt>,
}

impl MusicScreen {
    /// Load stored playlists. Must be called from within a tokio runtime.
    pub async fn open(platform: &Platform, settings: &AppSettings) -> Self {
        let persisted = Persisted::new(Arc::clone(&platform.storage), PLAYLISTS_KEY);
        let playlists: Playlists = persisted.load().await;
        tracing::info!(target: "music", "Playlists loaded: {} playlists", playlists.len());

        let player = new_player(Arc::clone(&platform.audio), settings);
        let progress = player.subscribe();

        Self {
            store: SnapshotStore::new(playlists),
            persisted,
            selection: Mutex::new(Selection::default()),
            player: tokio::sync::Mutex::new(player),
            progress,
            picker: Arc::clone(&platform.picker),
            prompt: Arc::clone(&platform.prompt),
        }
    }

    pub fn playlists(&self) -> Arc<Playlists> {
        self.store.snapshot()
    }

    pub fn selection(&self) -> Selection {
        self.lock_selection().clone()
    }

    /// Track under the current index of the active playlist, if both exist.
    pub fn current_track(&self) -> Option<Track> {
        let selection = self.selection();
        let playlists = self.store.snapshot();
        let name = selection.active.as_deref()?;
        playlists.tracks(name)?.get(selection.index).cloned()
    }

    /// Position and duration updates for the loaded sound.
    pub fn progress(&self) -> watch::Receiver<Progress> {
        self.progress.clone()
    }

    pub async fn state(&self) -> MusicState {
        let player = self.player.lock().await;
        MusicState {
            selection: self.selection(),
            player: player.state(),
        }
    }

    /// Create an empty `Playlist-N` and make it active.
    pub async fn create_playlist(&self) -> String {
        let _player = self.player.lock().await;

        let (snapshot, name) = self.store.apply(store::create);
        *self.lock_selection() = Selection {
            active: Some(name.clone()),
            index: 0,
        };
        tracing::info!(target: "music", playlist = %name, "Playlist created");

        self.persisted.save(&snapshot).await;
        name
    }

    /// Activate `name` and start its first track, if it has one.
    pub async fn select_playlist(&self, name: &str) -> Result<Option<Track>, MusicError> {
        let mut player = self.player.lock().await;

        if !self.store.snapshot().contains(name) {
            return Err(MusicError::PlaylistNotFound(name.to_string()));
        }

        {
            let mut selection = self.lock_selection();
            if selection.active.as_deref() == Some(name) {
                return Ok(None);
            }
            *selection = Selection {
                active: Some(name.to_string()),
                index: 0,
            };
        }
        tracing::debug!(target: "music", playlist = name, "Playlist selected");

        self.play_current(&mut player).await
    }

    /// Ask the picker for an audio file and append it to the active playlist.
    ///
    /// `Ok(None)` when the user cancelled or no playlist is active.
    pub async fn add_track(&self) -> Result<Option<Track>, MusicError> {
        let _player = self.player.lock().await;

        let Some(active) = self.selection().active else {
            tracing::debug!(target: "music", "Add track ignored, no active playlist");
            return Ok(None);
        };

        let picked = self.picker.pick_audio().await.map_err(|e| {
            tracing::error!(target: "music", "Document picker failed: {}", e);
            e
        })?;
        let Some(file) = picked else {
            tracing::debug!(target: "music", "Picker cancelled");
            return Ok(None);
        };

        let track = Track::from(file);
        let (snapshot, ()) = self
            .store
            .apply(|playlists| (store::append_track(playlists, &active, track.clone()), ()));
        tracing::info!(target: "music", playlist = %active, uri = %track.uri, "Track added");

        self.persisted.save(&snapshot).await;
        Ok(Some(track))
    }

    /// Rename `old` to `new`. The active selection follows the rename.
    pub async fn rename_playlist(&self, old: &str, new: &str) -> Result<String, MusicError> {
        let _player = self.player.lock().await;

        if !self.store.snapshot().contains(old) {
            return Err(MusicError::PlaylistNotFound(old.to_string()));
        }

        let (snapshot, result) = self.store.apply(|playlists| match store::rename(playlists, old, new) {
            Ok(next) => (next, Ok(())),
            Err(e) => (playlists.clone(), Err(e)),
        });
        if let Err(e) = result {
            return Err(reject(self.prompt.as_ref(), "music", e).await.into());
        }

        let new = new.trim().to_string();
        {
            let mut selection = self.lock_selection();
            if selection.active.as_deref() == Some(old) {
                selection.active = Some(new.clone());
            }
        }
        tracing::info!(target: "music", from = old, to = %new, "Playlist renamed");

        self.persisted.save(&snapshot).await;
        Ok(new)
    }

    /// Delete after confirmation. Deleting the active playlist stops playback.
    pub async fn delete_playlist(&self, name: &str) -> Result<bool, MusicError> {
        let mut player = self.player.lock().await;

        if !self.store.snapshot().contains(name) {
            return Err(MusicError::PlaylistNotFound(name.to_string()));
        }

        let request = ConfirmRequest::delete(
            "Delete Playlist",
            format!("Are you sure you want to delete \"{}\"?", name),
        );
        if !self.prompt.confirm(&request).await {
            tracing::debug!(target: "music", playlist = name, "Delete cancelled");
            return Ok(false);
        }

        let (snapshot, ()) = self.store.apply(|playlists| (store::delete(playlists, name), ()));

        let was_active = {
            let mut selection = self.lock_selection();
            let was_active = selection.active.as_deref() == Some(name);
            if was_active {
                *selection = Selection::default();
            }
            was_active
        };
        if was_active {
            player.unload().await;
        }
        tracing::info!(target: "music", playlist = name, was_active, "Playlist deleted");

        self.persisted.save(&snapshot).await;
        Ok(true)
    }

    /// Remove the track at `index` from the active playlist after confirmation.
    ///
    /// Removing the current track unloads it and resets the index to 0;
    /// removing an earlier track shifts the index down so the same track stays current.
    pub async fn remove_track(&self, index: usize) -> Result<bool, MusicError> {
        let mut player = self.player.lock().await;

        let active = self.selection().active.ok_or(MusicError::NoActivePlaylist)?;
        let playlists = self.store.snapshot();
        let tracks = playlists
            .tracks(&active)
            .ok_or_else(|| MusicError::PlaylistNotFound(active.clone()))?;
        let Some(track) = tracks.get(index) else {
            return Err(MusicError::TrackNotFound(index));
        };

        let request = ConfirmRequest {
            title: "Remove Song",
            message: format!("Remove \"{}\" from {}?", track.display_name(index), active),
            confirm_label: "Remove",
        };
        if !self.prompt.confirm(&request).await {
            tracing::debug!(target: "music", index, "Remove cancelled");
            return Ok(false);
        }

        let (snapshot, ()) = self
            .store
            .apply(|playlists| (store::remove_track(playlists, &active, index), ()));

        let removed_current = {
            let mut selection = self.lock_selection();
            if index == selection.index {
                selection.index = 0;
                true
            } else {
                if index < selection.index {
                    selection.index -= 1;
                }
                false
            }
        };
        if removed_current {
            player.unload().await;
        }
        tracing::info!(target: "music", playlist = %active, index, removed_current, "Track removed");

        self.persisted.save(&snapshot).await;
        Ok(true)
    }

    /// Make `index` current in the active playlist and play it.
    pub async fn play_index(&self, index: usize) -> Result<Track, MusicError> {
        let mut player = self.player.lock().await;

        let active = self.selection().active.ok_or(MusicError::NoActivePlaylist)?;
        let len = self.track_count(&active)?;
        if index >= len {
            return Err(MusicError::TrackNotFound(index));
        }

        self.lock_selection().index = index;
        self.play_current(&mut player)
            .await?
            .ok_or(MusicError::TrackNotFound(index))
    }

    pub async fn skip_next(&self) -> Result<Option<Track>, MusicError> {
        self.skip(true).await
    }

    pub async fn skip_previous(&self) -> Result<Option<Track>, MusicError> {
        self.skip(false).await
    }

    /// Returns whether audio is playing afterwards. Without a loaded sound this does nothing.
    pub async fn toggle_play_pause(&self) -> Result<bool, MusicError> {
        let mut player = self.player.lock().await;
        Ok(player.toggle_play_pause().await?)
    }

    pub async fn seek(&self, position: Duration) -> Result<(), MusicError> {
        let mut player = self.player.lock().await;
        Ok(player.seek(position).await?)
    }

    /// Release the sound, stop polling and flush pending playlist writes.
    pub async fn teardown(self) {
        self.player.lock().await.unload().await;
        self.persisted.close().await;
        tracing::debug!(target: "music", "Music screen torn down");
    }

    async fn skip(&self, forward: bool) -> Result<Option<Track>, MusicError> {
        let mut player = self.player.lock().await;

        let Some(active) = self.selection().active else {
            return Ok(None);
        };
        let len = self.track_count(&active)?;

        let next = {
            let mut selection = self.lock_selection();
            let Some(next) = store::skip_index(selection.index, len, forward) else {
                return Ok(None);
            };
            selection.index = next;
            next
        };
        tracing::debug!(target: "music", index = next, forward, "Skipping track");

        self.play_current(&mut player).await
    }

    /// Load and start the current track. `Ok(None)` when there is nothing to play.
    async fn play_current(&self, player: &mut Player) -> Result<Option<Track>, MusicError> {
        let Some(track) = self.current_track() else {
            return Ok(None);
        };

        if let Err(e) = player.play_uri(&track.uri).await {
            tracing::error!(target: "music", uri = %track.uri, "Failed to play track: {}", e);
            return Err(e.into());
        }
        Ok(Some(track))
    }

    fn track_count(&self, name: &str) -> Result<usize, MusicError> {
        self.store
            .snapshot()
            .tracks(name)
            .map(<[Track]>::len)
            .ok_or_else(|| MusicError::PlaylistNotFound(name.to_string()))
    }

    fn lock_selection(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn new_player(engine: Arc<dyn AudioEngine>, settings: &AppSettings) -> Player {
    Player::new(engine, settings.position_poll_interval())
}
