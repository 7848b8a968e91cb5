use reqwest::Client;

use super::MediaError;
use crate::{config::Config, types::SongLinkResponse};

/// Client for the song.link cross-platform resolver.
pub struct SongLink {
    http: Client,
    api_url: String,
}

impl SongLink {
    pub fn new(config: &Config, http: Client) -> Self {
        SongLink {
            http,
            api_url: config.songlink_api_url.clone(),
        }
    }

    /// Resolves a Spotify track id to the id of the matching YouTube video.
    pub async fn spotify_to_youtube(&self, spotify_id: &str) -> Result<String, MediaError> {
        let uri = format!("spotify:track:{spotify_id}");
        let response = self
            .http
            .get(format!("{}/links", self.api_url))
            .query(&[("url", uri.as_str()), ("songIfSingle", "true")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Status { status, body });
        }

        let links: SongLinkResponse = response.json().await?;
        let youtube = links
            .links_by_platform
            .get("youtube")
            .ok_or_else(|| MediaError::NoYoutubeMatch(spotify_id.to_string()))?;

        // entity ids look like "YOUTUBE_VIDEO::<video id>"
        youtube
            .entity_unique_id
            .split(':')
            .nth(2)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| MediaError::MalformedEntityId(youtube.entity_unique_id.clone()))
    }
}
