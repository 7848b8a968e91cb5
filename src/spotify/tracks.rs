use super::{SpotifyClient, SpotifyError};
use crate::{
    types::{CurrentlyPlayingResponse, RecentlyPlayedResponse, Track},
    utils::{convert_track, remove_duplicate_tracks},
};

pub const RECENTLY_PLAYED_LIMIT: u32 = 20;

impl SpotifyClient {
    /// The currently playing track followed by the recently played ones,
    /// most recent first, each track id appearing once.
    pub async fn get_tracks(&self) -> Result<Vec<Track>, SpotifyError> {
        let recent_path = format!("/me/player/recently-played?limit={RECENTLY_PLAYED_LIMIT}");
        let (current, recent) = tokio::try_join!(
            self.get::<CurrentlyPlayingResponse>("/me/player/currently-playing"),
            self.get::<RecentlyPlayedResponse>(&recent_path),
        )?;

        let mut tracks: Vec<Track> = Vec::new();
        if let Some(item) = current.and_then(|c| c.item) {
            tracks.extend(convert_track(&item));
        }
        if let Some(recent) = recent {
            tracks.extend(recent.items.iter().filter_map(|i| convert_track(&i.track)));
        }

        remove_duplicate_tracks(&mut tracks);
        Ok(tracks)
    }
}
