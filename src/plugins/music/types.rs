use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::core::picker::PickedFile;

/// A track reference inside a playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extra picker metadata (size, mimeType, ...), preserved as-is.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Track {
    pub fn new(uri: impl Into<String>, name: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            name,
            metadata: Map::new(),
        }
    }

    /// Name shown in the track list, falling back to the 1-based position.
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Track {}", index + 1),
        }
    }
}

impl From<PickedFile> for Track {
    fn from(file: PickedFile) -> Self {
        Self {
            uri: file.uri,
            name: file.name,
            metadata: file.metadata,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub name: String,
    pub tracks: Vec<Track>,
}

/// Playlist name -> tracks, in creation order.
///
/// Stored as a JSON object; key order is kept on load and save so the
/// playlist bar does not reshuffle between sessions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlists(Vec<Playlist>);

impl Playlists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Playlist> {
        self.0.iter().find(|playlist| playlist.name == name)
    }

    pub fn tracks(&self, name: &str) -> Option<&[Track]> {
        self.get(name).map(|playlist| playlist.tracks.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|playlist| playlist.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Playlist> {
        self.0.iter()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Playlist> {
        self.0.iter_mut().find(|playlist| playlist.name == name)
    }

    /// Insert or replace, keeping the original position when replacing.
    pub(crate) fn insert(&mut self, name: impl Into<String>, tracks: Vec<Track>) {
        let name = name.into();
        match self.get_mut(&name) {
            Some(existing) => existing.tracks = tracks,
            None => self.0.push(Playlist { name, tracks }),
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Playlist> {
        let index = self.0.iter().position(|playlist| playlist.name == name)?;
        Some(self.0.remove(index))
    }
}

impl Serialize for Playlists {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for playlist in &self.0 {
            map.serialize_entry(&playlist.name, &playlist.tracks)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Playlists {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlaylistsVisitor;

        impl<'de> Visitor<'de> for PlaylistsVisitor {
            type Value = Playlists;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping playlist names to track arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut playlists = Playlists::new();
                while let Some((name, tracks)) = access.next_entry::<String, Vec<Track>>()? {
                    // Duplicate keys: last one wins, first position kept
                    playlists.insert(name, tracks);
                }
                Ok(playlists)
            }
        }

        deserializer.deserialize_map(PlaylistsVisitor)
    }
}
