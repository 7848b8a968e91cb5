use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A track as shown to the owner. Identity is the Spotify id alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artist: String,
    pub id: String,
}

/// Addressable handle of a media object already uploaded to the messaging
/// platform. The file reference may be invalidated remotely at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFileReference {
    pub id: i64,
    pub access_hash: i64,
    #[serde(with = "base64_bytes")]
    pub file_reference: Vec<u8>,
}

mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(D::Error::custom)
    }
}

/// On-disk layout of the file reference cache.
///
/// `inline_docs` holds the placeholder documents registered for inline
/// results, `sent_docs` the real audio uploaded after a result was chosen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(default)]
    pub inline_docs: HashMap<String, CachedFileReference>,
    #[serde(default)]
    pub sent_docs: HashMap<String, CachedFileReference>,
}

/// On-disk layout of the Spotify credentials. All absent means logged out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpotifyAuth {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Unix time in seconds (fractional) of the last successful token grant.
    pub refreshed_at: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    pub item: Option<PlayableItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayedResponse {
    pub items: Vec<PlayHistoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistoryItem {
    pub track: PlayableItem,
}

/// A track or an episode, as returned by the player endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayableItem {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongLinkResponse {
    pub links_by_platform: HashMap<String, SongLinkPlatform>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongLinkPlatform {
    pub entity_unique_id: String,
}
