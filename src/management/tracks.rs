use std::{collections::HashMap, sync::Mutex};

use crate::types::Track;

/// Tracks shown in recent inline answers, looked up again when a result is chosen.
///
/// Entries are overwritten but never removed, so the index grows with the
/// number of distinct tracks seen during the process lifetime.
#[derive(Default)]
pub struct TrackIndex {
    tracks: Mutex<HashMap<String, Track>>,
}

impl TrackIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember_all(&self, tracks: &[Track]) {
        let mut index = self.tracks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for track in tracks {
            index.insert(track.id.clone(), track.clone());
        }
    }

    pub fn get(&self, track_id: &str) -> Option<Track> {
        let index = self.tracks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        index.get(track_id).cloned()
    }

    pub fn len(&self) -> usize {
        let index = self.tracks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
