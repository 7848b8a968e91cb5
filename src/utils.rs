use std::collections::HashSet;

use chrono::Utc;

use crate::types::{PlayableItem, Track};

/// Text shown under every sent track: a Spotify link and a song.link link.
pub fn link_bar(track_id: &str) -> String {
    format!(
        r#"<a href="https://open.spotify.com/track/{track_id}">Spotify</a> | <a href="https://song.link/s/{track_id}">Other</a>"#
    )
}

/// Text replacing the placeholder when a track could not be delivered.
pub fn error_text(track_id: &str) -> String {
    format!("Error :(\n{}", link_bar(track_id))
}

/// Turns a player item into a [`Track`], skipping episodes and local files.
pub fn convert_track(item: &PlayableItem) -> Option<Track> {
    if item.kind != "track" {
        return None;
    }
    let id = item.id.clone()?;
    let artist = item
        .artists
        .first()
        .map(|artist| artist.name.clone())
        .unwrap_or_default();
    Some(Track {
        id,
        name: item.name.clone(),
        artist,
    })
}

/// Keeps the first occurrence of every track id, preserving order.
pub fn remove_duplicate_tracks(tracks: &mut Vec<Track>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

/// Current unix time in fractional seconds.
pub fn unix_now() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}
