//! Pure playlist transformations.

use super::types::{Playlists, Track};
use crate::shared::errors::ValidationError;

/// Add an empty playlist named `Playlist-N` (N = count + 1, bumped past taken names).
pub fn create(playlists: &Playlists) -> (Playlists, String) {
    let mut n = playlists.len() + 1;
    let mut name = format!("Playlist-{}", n);
    while playlists.contains(&name) {
        n += 1;
        name = format!("Playlist-{}", n);
    }

    let mut next = playlists.clone();
    next.insert(name.clone(), Vec::new());
    (next, name)
}

/// Append `track` to playlist `name`. Unchanged if the playlist does not exist.
pub fn append_track(playlists: &Playlists, name: &str, track: Track) -> Playlists {
    let mut next = playlists.clone();
    if let Some(playlist) = next.get_mut(name) {
        playlist.tracks.push(track);
    }
    next
}

/// Re-key playlist `old` to `new`, keeping its position and tracks.
///
/// Rejects an empty name and a name already used by another playlist.
/// Renaming to the same name or renaming a missing playlist changes nothing.
pub fn rename(playlists: &Playlists, old: &str, new: &str) -> Result<Playlists, ValidationError> {
    let new = new.trim();
    if new.is_empty() {
        return Err(ValidationError::PlaylistNameRequired);
    }
    if new == old || !playlists.contains(old) {
        return Ok(playlists.clone());
    }
    if playlists.contains(new) {
        return Err(ValidationError::PlaylistNameTaken(new.to_string()));
    }

    let mut next = playlists.clone();
    if let Some(playlist) = next.get_mut(old) {
        playlist.name = new.to_string();
    }
    Ok(next)
}

pub fn delete(playlists: &Playlists, name: &str) -> Playlists {
    let mut next = playlists.clone();
    next.remove(name);
    next
}

/// Remove the track at `index` from playlist `name`. Out-of-range indices change nothing.
pub fn remove_track(playlists: &Playlists, name: &str, index: usize) -> Playlists {
    let mut next = playlists.clone();
    if let Some(playlist) = next.get_mut(name) {
        if index < playlist.tracks.len() {
            playlist.tracks.remove(index);
        }
    }
    next
}

/// Next (or previous) index in a list of `len`, wrapping at both ends.
pub fn skip_index(current: usize, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current % len;
    Some(if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    })
}
