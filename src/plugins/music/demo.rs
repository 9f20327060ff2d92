//! Built-in demo playlist of streamed tracks, with play modes.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::player::{Player, PlayerState};
use super::MusicError;
use crate::core::platform::Platform;
use crate::core::settings::AppSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoTrack {
    pub title: &'static str,
    pub uri: &'static str,
    pub cover: &'static str,
}

pub static DEMO_TRACKS: [DemoTrack; 3] = [
    DemoTrack {
        title: "Lofi Chill",
        uri: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
        cover: "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?auto=format&fit=crop&w=500&q=80",
    },
    DemoTrack {
        title: "Chill Vibes",
        uri: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
        cover: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?auto=format&fit=crop&w=500&q=80",
    },
    DemoTrack {
        title: "Smooth Jazz",
        uri: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
        cover: "https://images.unsplash.com/photo-1497032628192-86f99bcd76bc?auto=format&fit=crop&w=500&q=80",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    #[default]
    Normal,
    Loop,
    Shuffle,
}

impl PlayMode {
    pub fn cycle(self) -> Self {
        match self {
            PlayMode::Normal => PlayMode::Loop,
            PlayMode::Loop => PlayMode::Shuffle,
            PlayMode::Shuffle => PlayMode::Normal,
        }
    }
}

/// Index to play after `current` in a list of `len` tracks.
///
/// Shuffle never repeats the current track unless it is the only one.
pub fn next_index<R: Rng + ?Sized>(mode: PlayMode, current: usize, len: usize, rng: &mut R) -> usize {
    if len == 0 {
        return 0;
    }
    match mode {
        PlayMode::Normal => (current + 1) % len,
        PlayMode::Loop => current % len,
        PlayMode::Shuffle if len == 1 => 0,
        PlayMode::Shuffle => {
            let pick = rng.gen_range(0..len - 1);
            if pick >= current % len {
                pick + 1
            } else {
                pick
            }
        }
    }
}

/// The demo screen: a fixed playlist sharing the same [`Player`] as user playlists.
pub struct DemoPlayer {
    player: Player,
    index: usize,
    mode: PlayMode,
}

impl DemoPlayer {
    pub fn open(platform: &Platform, settings: &AppSettings) -> Self {
        Self {
            player: super::new_player(Arc::clone(&platform.audio), settings),
            index: 0,
            mode: PlayMode::default(),
        }
    }

    pub fn tracks(&self) -> &'static [DemoTrack] {
        &DEMO_TRACKS
    }

    pub fn current(&self) -> &'static DemoTrack {
        &DEMO_TRACKS[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PlayMode) {
        tracing::debug!(target: "music", ?mode, "Demo play mode changed");
        self.mode = mode;
    }

    pub fn state(&self) -> PlayerState {
        self.player.state()
    }

    pub async fn play_index(&mut self, index: usize) -> Result<&'static DemoTrack, MusicError> {
        let Some(track) = DEMO_TRACKS.get(index) else {
            return Err(MusicError::TrackNotFound(index));
        };

        self.index = index;
        if let Err(e) = self.player.play_uri(track.uri).await {
            tracing::error!(target: "music", title = track.title, "Audio load error: {}", e);
            return Err(e.into());
        }
        Ok(track)
    }

    /// Advance according to the play mode.
    pub async fn skip_next(&mut self) -> Result<&'static DemoTrack, MusicError> {
        let next = next_index(self.mode, self.index, DEMO_TRACKS.len(), &mut rand::thread_rng());
        self.play_index(next).await
    }

    pub async fn skip_previous(&mut self) -> Result<&'static DemoTrack, MusicError> {
        let len = DEMO_TRACKS.len();
        self.play_index((self.index + len - 1) % len).await
    }

    pub async fn toggle_play_pause(&mut self) -> Result<bool, MusicError> {
        Ok(self.player.toggle_play_pause().await?)
    }

    pub async fn teardown(mut self) {
        self.player.unload().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_normal_wraps_and_loop_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(next_index(PlayMode::Normal, 2, 3, &mut rng), 0);
        assert_eq!(next_index(PlayMode::Normal, 0, 3, &mut rng), 1);
        assert_eq!(next_index(PlayMode::Loop, 1, 3, &mut rng), 1);
    }

    #[test]
    fn test_shuffle_never_repeats_current() {
        let mut rng = StdRng::seed_from_u64(42);
        for current in 0..3 {
            for _ in 0..50 {
                let next = next_index(PlayMode::Shuffle, current, 3, &mut rng);
                assert_ne!(next, current);
                assert!(next < 3);
            }
        }
        assert_eq!(next_index(PlayMode::Shuffle, 0, 1, &mut rng), 0);
    }

    #[test]
    fn test_mode_cycles_and_serializes_lowercase() {
        assert_eq!(PlayMode::Normal.cycle().cycle().cycle(), PlayMode::Normal);
        assert_eq!(serde_json::to_string(&PlayMode::Shuffle).unwrap(), "\"shuffle\"");
    }
}
